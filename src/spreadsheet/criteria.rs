use glob::Pattern;

/// Selects which sheets of a spreadsheet are read.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Sheet name patterns; `None` accepts every sheet.
    pub sheet_name_patterns: Option<Vec<Pattern>>,

    /// Maximum number of sheets to read.
    pub sheet_limit: Option<usize>,
}

impl Criteria {
    /// Accepts exactly one sheet, matched by its literal name.
    pub fn only(sheet_name: &str) -> Self {
        let pattern = Pattern::new(&Pattern::escape(sheet_name)).expect("escaped sheet name");
        Self {
            sheet_name_patterns: Some(vec![pattern]),
            sheet_limit: Some(1),
        }
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        match &self.sheet_name_patterns {
            Some(patterns) => patterns.iter().any(|pattern| pattern.matches(sheet_name)),
            None => true,
        }
    }

    /// Returns true once `count` sheets have been read and the limit is reached.
    pub(crate) fn is_exhausted(&self, count: usize) -> bool {
        self.sheet_limit.map(|limit| count >= limit).unwrap_or(false)
    }
}
