use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::TimeDelta;
use std::fmt::Display;

/// Storage type of a cell as declared by the spreadsheet file.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as 0/1
    Boolean,
    /// Plain numeric values
    Number,
    /// Date, time or datetime serials counted from the 1900 epoch
    NumberDate1900,
    /// Date, time or datetime serials counted from the 1904 epoch
    NumberDate1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// ISO 8601 duration strings
    IsoDuration,
    /// Inline string values
    InlineString,
    /// Index into the shared string table
    SharedString,
    /// Error values such as `#DIV/0!`
    Error,
}

impl CellType {
    fn date(is_1904: bool) -> Self {
        if is_1904 {
            Self::NumberDate1904
        } else {
            Self::NumberDate1900
        }
    }

    /// Maps built-in Excel number format IDs that denote dates or times.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "14" | "15" | "16" | "17" | "18" | "19" | "20" | "21" | "22" | "45" | "46" | "47" => {
                Some(Self::date(is_1904))
            }
            _ => None,
        }
    }

    /// Inspects a custom number format code for date/time tokens,
    /// ignoring quoted literals, escaped characters and `[...]` sections.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' if !is_literal => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_literal && !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_bracket && !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' | 'H' | 'h' | 'S' | 's' => is_date = true,
                _ => (),
            }
        }

        if is_date {
            Self::date(is_1904)
        } else {
            Self::Number
        }
    }
}

/// A cell value as seen by the extraction engine.
///
/// Spreadsheet cells are heterogeneous; everything a reader produces is folded
/// into this closed set so consumers can match exhaustively.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// Missing or blank cell
    #[default]
    Empty,
    /// Integer or real number
    Number(f64),
    /// Free text, possibly carrying units such as `"8500 Litre"`
    Text(String),
    /// Date or datetime
    Date(NaiveDateTime),
    /// Booleans, error codes, durations and anything else
    Other(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_owned())
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Text(value) | CellValue::Other(value) => f.write_str(value),
            CellValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Raw cell as decoded from the file, before shared strings and number
/// formats are resolved.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Declared storage type
    pub(crate) kind: CellType,
    /// Cell value as string
    pub(crate) value: String,
}

impl Cell {
    /// Resolves the raw value into a [`CellValue`].
    ///
    /// Values that do not fit their declared type are kept as text rather
    /// than rejected; the coercion policy decides what they are worth.
    pub(crate) fn to_value(&self, shared_strings: &[String]) -> CellValue {
        match self.kind {
            CellType::Empty => CellValue::Empty,
            CellType::Boolean => CellValue::Other(if self.value == "1" { "TRUE" } else { "FALSE" }.to_owned()),
            CellType::Number => match self.value.trim().parse::<f64>() {
                Ok(number) => CellValue::Number(number),
                Err(_) => CellValue::Text(self.value.to_owned()),
            },
            CellType::NumberDate1900 | CellType::NumberDate1904 => {
                let is_1904 = self.kind == CellType::NumberDate1904;
                self.value
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(|serial| serial_to_datetime(serial, is_1904))
                    .map(CellValue::Date)
                    .unwrap_or_else(|| CellValue::Text(self.value.to_owned()))
            }
            CellType::IsoDateTime => parse_iso_datetime(&self.value)
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Text(self.value.to_owned())),
            CellType::IsoDuration | CellType::Error => CellValue::Other(self.value.to_owned()),
            CellType::InlineString => CellValue::Text(self.value.to_owned()),
            CellType::SharedString => self.value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| shared_strings.get(index))
                .map(|text| CellValue::from(text.as_str()))
                .unwrap_or_default(),
        }
    }
}

/// Converts an Excel date serial to a datetime.
/// Serials below 60 are shifted by one day to undo the Lotus 1-2-3 leap year bug.
pub(crate) fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.trunc() as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let milliseconds = (serial.fract() * 86_400_000f64).round() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::try_days(days + offset)?)?
        .checked_add_signed(TimeDelta::try_milliseconds(milliseconds)?)
}

/// Parses `2025-07-01T10:30:00`, `2025-07-01T10:30:00.5` or `2025-07-01`.
fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    if value.contains('T') {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }
}
