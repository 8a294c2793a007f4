use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::reference::MAX_COLUMNS;
use crate::spreadsheet::reference::MAX_ROWS;
use log::debug;

static EMPTY: CellValue = CellValue::Empty;

/// One sheet of a workbook as a grid of values.
///
/// Row 0 and column 0 are spreadsheet row 1 and column A. Rows are stored up
/// to their last used cell only; [`Table::cell`] reads the rest of the sheet
/// width as empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    name: String,
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Table {
    /// Builds a table; the width is that of the widest row.
    pub fn new(name: &str, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            name: name.to_owned(),
            rows,
            width,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored rows, each possibly shorter than [`Table::width`].
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Right-most used column of the sheet plus one.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Value at a position inside the sheet, `None` outside of it.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        if col >= self.width {
            return None;
        }
        self.rows.get(row).map(|cells| cells.get(col).unwrap_or(&EMPTY))
    }
}

/// Collects raw cells of one sheet while a reader walks the file.
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in reading order
    cells: Vec<Cell>,
    row_upper_bound: Option<usize>,
    col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(super) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell, widening the data range to cover it. Cells beyond the
    /// worksheet grid are dropped.
    pub(super) fn push(&mut self, cell: Cell) {
        if cell.row >= MAX_ROWS || cell.col >= MAX_COLUMNS {
            debug!("Drop cell ({}, {}) outside the grid of '{}'", cell.row, cell.col, self.name);
            return;
        }
        if self.row_upper_bound.map(|bound| bound < cell.row).unwrap_or(true) {
            self.row_upper_bound = Some(cell.row);
        }
        if self.col_upper_bound.map(|bound| bound < cell.col).unwrap_or(true) {
            self.col_upper_bound = Some(cell.col);
        }
        self.cells.push(cell);
    }

    /// Resolves every cell and lays them out row by row.
    pub(super) fn finish(self, shared_strings: &[String]) -> Table {
        let (height, width) = match self.row_upper_bound.zip(self.col_upper_bound) {
            Some((row, col)) => (row + 1, col + 1),
            None => (0, 0),
        };
        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); height];
        for cell in &self.cells {
            let cells = &mut rows[cell.row];
            if cells.len() <= cell.col {
                cells.resize(cell.col + 1, CellValue::Empty);
            }
            cells[cell.col] = cell.to_value(shared_strings);
        }
        Table {
            name: self.name,
            rows,
            width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellType;

    fn push(sheet: &mut Sheet, row: usize, col: usize, value: &str) {
        sheet.push(Cell {
            row,
            col,
            kind: CellType::InlineString,
            value: value.to_owned(),
        });
    }

    #[test]
    fn sheet_initial() {
        let sheet = Sheet::new("Data");
        assert!(sheet.is_empty());
        let table = sheet.finish(&[]);
        assert_eq!(table.name(), "Data");
        assert_eq!(table.height(), 0);
        assert_eq!(table.width(), 0);
    }

    #[test]
    fn sheet_finish_keeps_rows_short() {
        let mut sheet = Sheet::new("Data");
        push(&mut sheet, 1, 1, "b2");
        push(&mut sheet, 1, 3, "d2");
        push(&mut sheet, 3, 2, "c4");
        let table = sheet.finish(&[]);

        assert_eq!(table.height(), 4);
        assert_eq!(table.width(), 4);
        let lengths: Vec<usize> = table.rows().iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![0, 4, 0, 3]);
        assert_eq!(table.cell(0, 0), Some(&CellValue::Empty));
        assert_eq!(table.cell(1, 3), Some(&CellValue::Text("d2".to_owned())));
        assert_eq!(table.cell(3, 2), Some(&CellValue::Text("c4".to_owned())));
        assert_eq!(table.cell(3, 3), Some(&CellValue::Empty));
        assert_eq!(table.cell(3, 4), None);
        assert_eq!(table.cell(4, 0), None);
    }

    #[test]
    fn far_corner_cell_stays_sparse() {
        let mut sheet = Sheet::new("Data");
        push(&mut sheet, 0, 2, "Water");
        push(&mut sheet, MAX_ROWS - 1, MAX_COLUMNS - 1, "note");
        let table = sheet.finish(&[]);

        assert_eq!(table.height(), MAX_ROWS);
        assert_eq!(table.width(), MAX_COLUMNS);
        let stored: usize = table.rows().iter().map(Vec::len).sum();
        assert_eq!(stored, 3 + MAX_COLUMNS);
        assert_eq!(table.cell(MAX_ROWS / 2, 7), Some(&CellValue::Empty));
    }

    #[test]
    fn cells_outside_the_grid_are_dropped() {
        let mut sheet = Sheet::new("Data");
        push(&mut sheet, MAX_ROWS, 0, "below");
        push(&mut sheet, 0, MAX_COLUMNS, "right");
        assert!(sheet.is_empty());
        push(&mut sheet, 0, 0, "a1");
        let table = sheet.finish(&[]);
        assert_eq!((table.height(), table.width()), (1, 1));
    }

    #[test]
    fn table_keeps_ragged_rows() {
        let table = Table::new("t", vec![vec![CellValue::from(1.0)], vec![], vec![CellValue::Empty; 3]]);
        assert_eq!(table.width(), 3);
        assert!(table.rows()[1].is_empty());
        assert_eq!(table.cell(1, 2), Some(&CellValue::Empty));
        assert_eq!(table.cell(0, 0), Some(&CellValue::Number(1.0)));
    }
}
