use crate::error::EsgSheetError;
use crate::spreadsheet::RawWorkbook;
use crate::spreadsheet::SpreadsheetError;
use crate::spreadsheet::Table;
use glob::Pattern;
use log::debug;

/// Sheet names tried in order before falling back to the first sheet.
pub const DEFAULT_SHEET_PREFERENCES: [&str; 4] = ["Project 1", "Site_Template", "Consolidated_Data", "Data"];

/// Picks the sheet holding the site data.
#[derive(Clone, Debug)]
pub struct SheetSelector {
    preferences: Vec<Pattern>,
}

impl Default for SheetSelector {
    fn default() -> Self {
        let preferences = DEFAULT_SHEET_PREFERENCES
            .iter()
            .map(|name| Pattern::new(name).expect("Hardcode sheet name"))
            .collect();
        Self { preferences }
    }
}

impl SheetSelector {
    /// Builds a selector from glob patterns; a plain name matches itself.
    pub fn new<S: AsRef<str>>(preferences: &[S]) -> Result<Self, EsgSheetError> {
        let preferences = preferences
            .iter()
            .map(|preference| Pattern::new(preference.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { preferences })
    }

    /// Chooses among sheet names given in workbook order.
    ///
    /// Preferences are tried in order; within one preference the earliest
    /// matching sheet wins. Without any match the first sheet is chosen.
    pub fn select_name<'a, S: AsRef<str>>(&self, names: &'a [S]) -> Option<&'a str> {
        self.preferences
            .iter()
            .find_map(|pattern| names.iter().find(|name| pattern.matches(name.as_ref())))
            .or_else(|| names.first())
            .map(|name| name.as_ref())
    }

    /// Chooses the data sheet of a workbook.
    pub fn select<'a>(&self, workbook: &'a RawWorkbook) -> Result<&'a Table, EsgSheetError> {
        let names = workbook.sheet_names();
        let name = self
            .select_name(names.as_slice())
            .ok_or_else(|| SpreadsheetError::EmptyWorkbook(workbook.file_name().to_owned()))?;
        debug!("Select sheet '{}' of '{}'", name, workbook.file_name());
        workbook
            .sheet(name)
            .ok_or_else(|| SpreadsheetError::EmptyWorkbook(workbook.file_name().to_owned()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook(names: &[&str]) -> RawWorkbook {
        RawWorkbook::from_tables("site.xlsx", names.iter().map(|name| Table::new(name, vec![])).collect())
    }

    #[test]
    fn preference_order_beats_sheet_order() {
        let selector = SheetSelector::default();
        let workbook = workbook(&["Summary", "Data", "Project 1"]);
        assert_eq!(selector.select(&workbook).unwrap().name(), "Project 1");
        assert_eq!(selector.select_name(&["Data", "Consolidated_Data"]), Some("Consolidated_Data"));
    }

    #[test]
    fn fall_back_to_first_sheet() {
        let selector = SheetSelector::default();
        let workbook = workbook(&["Summary", "Sheet2"]);
        assert_eq!(selector.select(&workbook).unwrap().name(), "Summary");
    }

    #[test]
    fn names_match_exactly() {
        let selector = SheetSelector::default();
        assert_eq!(selector.select_name(&["project 1", "Data "]), Some("project 1"));
    }

    #[test]
    fn empty_workbook_fails() {
        let selector = SheetSelector::default();
        let error = selector.select(&workbook(&[])).unwrap_err();
        assert!(matches!(error, EsgSheetError::SpreadsheetError(SpreadsheetError::EmptyWorkbook(_))));
        assert_eq!(selector.select_name::<&str>(&[]), None);
    }

    #[test]
    fn custom_glob_preferences() {
        let selector = SheetSelector::new(&["FY2[0-9]*", "Data"]).unwrap();
        assert_eq!(selector.select_name(&["Data", "FY23-24"]), Some("FY23-24"));
        assert!(SheetSelector::new(&["[unclosed"]).is_err());
    }
}
