use crate::spreadsheet::CellValue;
use serde::Serialize;
use std::fmt::Display;

/// Resource a template row reports on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ResourceCategory {
    Water,
    Diesel,
    Electricity,
    Cement,
    Steel,
    Unclassified,
}

impl ResourceCategory {
    /// Categories that accumulate quantities, in reporting order.
    pub const TRACKED: [ResourceCategory; 5] = [
        ResourceCategory::Water,
        ResourceCategory::Diesel,
        ResourceCategory::Electricity,
        ResourceCategory::Cement,
        ResourceCategory::Steel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Water => "Water",
            ResourceCategory::Diesel => "Diesel",
            ResourceCategory::Electricity => "Electricity",
            ResourceCategory::Cement => "Cement",
            ResourceCategory::Steel => "Steel",
            ResourceCategory::Unclassified => "Unclassified",
        }
    }
}

impl Display for ResourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keywords in priority order; the first one found in a description wins.
const KEYWORDS: &[(&str, ResourceCategory)] = &[
    ("water", ResourceCategory::Water),
    ("diesel", ResourceCategory::Diesel),
    ("fuel", ResourceCategory::Diesel),
    ("electricity", ResourceCategory::Electricity),
    ("cement", ResourceCategory::Cement),
    ("concrete", ResourceCategory::Cement),
    ("steel", ResourceCategory::Steel),
    ("metal", ResourceCategory::Steel),
];

/// Assigns rows to resource categories by their description text.
#[derive(Copy, Clone, Debug)]
pub struct RowClassifier {
    description_column: usize,
    min_row_width: usize,
}

impl Default for RowClassifier {
    fn default() -> Self {
        Self {
            description_column: 2,
            min_row_width: 4,
        }
    }
}

impl RowClassifier {
    pub fn new(description_column: usize, min_row_width: usize) -> Self {
        Self {
            description_column,
            min_row_width: min_row_width.max(description_column + 1),
        }
    }

    /// Classifies a row of a sheet `width` columns wide. Every row of a
    /// sheet narrower than the template is unclassified; `row` itself may
    /// stop at its last used cell.
    pub fn classify(&self, row: &[CellValue], width: usize) -> ResourceCategory {
        if width.max(row.len()) < self.min_row_width {
            return ResourceCategory::Unclassified;
        }
        match row.get(self.description_column) {
            Some(description) => Self::classify_text(&description.to_string()),
            None => ResourceCategory::Unclassified,
        }
    }

    /// Classifies a description by case-insensitive keyword search.
    pub fn classify_text(description: &str) -> ResourceCategory {
        let description = description.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| description.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or(ResourceCategory::Unclassified)
    }
}
