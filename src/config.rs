use crate::engine::coerce::CoercionMode;
use crate::engine::coerce::DigitPattern;
use crate::engine::emission::EmissionFactors;
use crate::engine::select::DEFAULT_SHEET_PREFERENCES;
use crate::error::EsgSheetError;
use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

/// Settings of the extraction engine.
///
/// Every field has a default matching the standard site template, so a
/// configuration file only needs to name what differs:
///
/// ```json
/// { "coercion_mode": "strict", "emission_factors": { "steel": 2.3 } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sheet name glob patterns tried in order
    pub sheet_preferences: Vec<String>,
    /// Column holding the row description
    pub description_column: usize,
    /// Rows narrower than this are ignored
    pub min_row_width: usize,
    /// Column of January; the eleven following columns hold the other months
    pub first_month_column: usize,
    /// Rows skipped at the top of the data sheet
    pub header_rows: usize,
    /// Capacity in MW when the file name carries none
    pub default_capacity: u32,
    pub digit_pattern: DigitPattern,
    pub coercion_mode: CoercionMode,
    pub emission_factors: EmissionFactors,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sheet_preferences: DEFAULT_SHEET_PREFERENCES.iter().map(|name| name.to_string()).collect(),
            description_column: 2,
            min_row_width: 4,
            first_month_column: 5,
            header_rows: 0,
            default_capacity: 100,
            digit_pattern: DigitPattern::default(),
            coercion_mode: CoercionMode::default(),
            emission_factors: EmissionFactors::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, EsgSheetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).with_context(|| format!("Read config '{}' failed", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Parse config '{}' failed", path.display()))
    }
}
