//! Cell coercion: every cell becomes a non-negative quantity.
//!
//! Spreadsheet authors type whatever they like into monthly columns
//! (`8500`, `"8500 Litre"`, `"n/a"`, a date). The coercer keeps the first run
//! of digits in text and treats anything it cannot read as zero. In strict
//! mode the same numbers are produced, but every lossy cell is reported.
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::CellValue;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::sync::LazyLock;

static DECIMAL_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("Hardcode pattern"));
static INTEGER_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("Hardcode pattern"));

/// Which digit run is taken from text cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitPattern {
    /// Digits with an optional decimal part: `"12.5 kL"` is 12.5
    #[default]
    Decimal,
    /// Digits only: `"12.5 kL"` is 12
    DigitsOnly,
}

impl DigitPattern {
    fn regex(&self) -> &'static Regex {
        match self {
            DigitPattern::Decimal => &DECIMAL_DIGITS,
            DigitPattern::DigitsOnly => &INTEGER_DIGITS,
        }
    }
}

/// Whether lossy cells are reported.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionMode {
    /// Unreadable cells silently count as zero
    #[default]
    Lenient,
    /// Same values as lenient, plus one warning per lossy cell
    Strict,
}

/// A cell whose content was not a clean number.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoercionWarning {
    /// Sheet the cell belongs to
    pub sheet: String,
    /// A1-style reference of the cell
    pub reference: String,
    /// Cell content as text
    pub raw: String,
    /// Value the cell was coerced to
    pub coerced: f64,
}

impl Display for CoercionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}!{}: '{}' read as {}", self.sheet, self.reference, self.raw, self.coerced)
    }
}

/// Outcome of coercing one cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Coerced {
    /// The cell was empty or held exactly this number
    Clean(f64),
    /// Part of the cell was discarded to get this number
    Lossy(f64),
}

impl Coerced {
    pub fn value(&self) -> f64 {
        match self {
            Coerced::Clean(value) | Coerced::Lossy(value) => *value,
        }
    }

    pub fn is_lossy(&self) -> bool {
        matches!(self, Coerced::Lossy(_))
    }
}

/// Converts cell values into quantities. Never fails.
#[derive(Copy, Clone, Debug, Default)]
pub struct CellCoercer {
    digits: DigitPattern,
    mode: CoercionMode,
}

impl CellCoercer {
    pub fn new(digits: DigitPattern, mode: CoercionMode) -> Self {
        Self { digits, mode }
    }

    pub fn mode(&self) -> CoercionMode {
        self.mode
    }

    /// Coerces a cell to a non-negative number.
    pub fn coerce(&self, value: &CellValue) -> f64 {
        self.classify(value).value()
    }

    /// Coerces a cell and tells whether anything was discarded.
    pub fn classify(&self, value: &CellValue) -> Coerced {
        match value {
            CellValue::Empty => Coerced::Clean(0.0),
            CellValue::Number(number) if number.is_finite() && *number >= 0.0 => Coerced::Clean(*number),
            CellValue::Number(_) => Coerced::Lossy(0.0),
            CellValue::Text(text) => self.coerce_text(text),
            CellValue::Date(_) | CellValue::Other(_) => Coerced::Lossy(0.0),
        }
    }

    fn coerce_text(&self, text: &str) -> Coerced {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Coerced::Clean(0.0);
        }
        let found = self.digits
            .regex()
            .find(trimmed)
            .and_then(|found| found.as_str().parse::<f64>().ok().map(|number| (found.as_str(), number)));
        match found {
            Some((digits, number)) if digits == trimmed => Coerced::Clean(number),
            Some((_, number)) => Coerced::Lossy(number),
            None => Coerced::Lossy(0.0),
        }
    }

    /// Coerces the cell at (`row`, `col`) of `sheet`, recording a warning in
    /// strict mode when the cell was lossy.
    pub fn coerce_at(&self, value: &CellValue, sheet: &str, row: usize, col: usize, warnings: &mut Vec<CoercionWarning>) -> f64 {
        let coerced = self.classify(value);
        if self.mode == CoercionMode::Strict && coerced.is_lossy() {
            warnings.push(CoercionWarning {
                sheet: sheet.to_owned(),
                reference: index_to_reference(row, col),
                raw: value.to_string(),
                coerced: coerced.value(),
            });
        }
        coerced.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_owned())
    }

    #[test]
    fn coerce_documented_examples() {
        let coercer = CellCoercer::default();
        assert_eq!(coercer.coerce(&text("8500 Litre")), 8500.0);
        assert_eq!(coercer.coerce(&text("")), 0.0);
        assert_eq!(coercer.coerce(&CellValue::Empty), 0.0);
        assert_eq!(coercer.coerce(&CellValue::Number(42.5)), 42.5);
    }

    #[test]
    fn numbers_pass_through_unrounded() {
        let coercer = CellCoercer::default();
        for value in [0.0, 1.0, 0.125, 1234567.891, 1e12] {
            assert_eq!(coercer.coerce(&CellValue::Number(value)), value);
        }
    }

    #[test]
    fn numeric_and_blank_cells_are_never_negative() {
        let coercer = CellCoercer::default();
        for value in [-1.0, -0.0001, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 3.5] {
            let coerced = coercer.coerce(&CellValue::Number(value));
            assert!(coerced >= 0.0, "{value} coerced to {coerced}");
        }
        assert_eq!(coercer.coerce(&CellValue::Empty), 0.0);
    }

    #[test]
    fn text_without_digits_is_zero() {
        let coercer = CellCoercer::default();
        for value in ["n/a", "-", "nil", "Litre", "   ", "NA."] {
            assert_eq!(coercer.coerce(&text(value)), 0.0, "{value}");
        }
    }

    #[test]
    fn first_digit_run_wins() {
        let decimal = CellCoercer::new(DigitPattern::Decimal, CoercionMode::Lenient);
        let digits = CellCoercer::new(DigitPattern::DigitsOnly, CoercionMode::Lenient);
        assert_eq!(decimal.coerce(&text("12.5 kL then 40")), 12.5);
        assert_eq!(digits.coerce(&text("12.5 kL then 40")), 12.0);
        assert_eq!(decimal.coerce(&text("approx. 300")), 300.0);
        assert_eq!(decimal.coerce(&text("-45")), 45.0);
        assert_eq!(decimal.coerce(&text("7.")), 7.0);
    }

    #[test]
    fn other_cells_are_zero() {
        let coercer = CellCoercer::default();
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(coercer.coerce(&CellValue::Date(date)), 0.0);
        assert_eq!(coercer.coerce(&CellValue::Other("TRUE".to_owned())), 0.0);
        assert_eq!(coercer.coerce(&CellValue::Other("#DIV/0!".to_owned())), 0.0);
    }

    #[test]
    fn classify_lossy_cells() {
        let coercer = CellCoercer::default();
        assert_eq!(coercer.classify(&text(" 250 ")), Coerced::Clean(250.0));
        assert_eq!(coercer.classify(&text("250 L")), Coerced::Lossy(250.0));
        assert_eq!(coercer.classify(&text("none")), Coerced::Lossy(0.0));
        assert_eq!(coercer.classify(&CellValue::Number(-3.0)), Coerced::Lossy(0.0));
        assert_eq!(coercer.classify(&CellValue::Empty), Coerced::Clean(0.0));
    }

    #[test]
    fn strict_mode_reports_warnings() {
        let mut warnings = Vec::new();
        let strict = CellCoercer::new(DigitPattern::Decimal, CoercionMode::Strict);
        assert_eq!(strict.coerce_at(&text("8500 Litre"), "Project 1", 3, 5, &mut warnings), 8500.0);
        assert_eq!(strict.coerce_at(&CellValue::Number(10.0), "Project 1", 3, 6, &mut warnings), 10.0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].reference, "F4");
        assert_eq!(warnings[0].to_string(), "Project 1!F4: '8500 Litre' read as 8500");

        let lenient = CellCoercer::default();
        let mut none = Vec::new();
        assert_eq!(lenient.coerce_at(&text("8500 Litre"), "Project 1", 3, 5, &mut none), 8500.0);
        assert!(none.is_empty());
    }
}
