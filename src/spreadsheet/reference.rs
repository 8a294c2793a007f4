//! Conversion between A1-style cell references and 0-based indexes.

/// Converts a 0-based (row, col) pair to an A1 reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut letters = Vec::<char>::new();
    let mut col = col + 1;
    while col > 0 {
        col -= 1;
        letters.push((b'A' + (col % 26) as u8) as char);
        col /= 26;
    }
    let mut reference: String = letters.into_iter().rev().collect();
    reference.push_str(&(row + 1).to_string());
    reference
}

/// Number of columns of a worksheet, `A` to `XFD`.
pub(crate) const MAX_COLUMNS: usize = 16_384;
/// Number of rows of a worksheet.
pub(crate) const MAX_ROWS: usize = 1_048_576;

/// Converts an A1 reference (`"C7"`, `"$AA$10"`) to a 0-based (row, col) pair.
/// Returns `None` when the reference lacks a column or a row part, or points
/// outside the worksheet grid.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let mut col = 0usize;
    let mut row = 0usize;
    let mut has_col = false;
    let mut has_row = false;
    for character in reference.chars() {
        match character {
            '$' => (),
            'A'..='Z' | 'a'..='z' if !has_row => {
                has_col = true;
                col = col
                    .checked_mul(26)?
                    .checked_add(character.to_ascii_uppercase() as usize - 'A' as usize + 1)
                    .filter(|col| *col <= MAX_COLUMNS)?;
            }
            '0'..='9' => {
                has_row = true;
                row = row
                    .checked_mul(10)?
                    .checked_add(character as usize - '0' as usize)
                    .filter(|row| *row <= MAX_ROWS)?;
            }
            _ => return None,
        }
    }
    if has_col && has_row && row > 0 {
        Some((row - 1, col - 1))
    } else {
        None
    }
}
