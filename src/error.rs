use thiserror::Error;

/// Main error type of the crate.
/// Aggregates errors from the standard library, dependencies and internal modules.
#[derive(Error, Debug)]
pub enum EsgSheetError {
    #[error("{0}")]
    WithContextError(String),

    #[error("{0}")]
    AnyhowError(#[from] anyhow::Error),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    XlsxWriterError(#[from] rust_xlsxwriter::XlsxError),

    #[error("{0}")]
    ConfigError(#[from] serde_json::Error),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    #[error("{0}")]
    OdsError(#[from] crate::spreadsheet::ods::OdsError),

    // Engine errors
    #[error("No data extracted: none of the {0} file(s) produced a site record")]
    NoDataExtracted(usize),
}

/// Failure to turn one uploaded file into a site record.
///
/// The batch keeps going when a file fails; the error is reported next to
/// the other outcomes as a named warning.
#[derive(Error, Debug)]
#[error("Extract site '{site}' failed: {cause}")]
pub struct ExtractionError {
    /// Site name derived from the file name
    pub site: String,
    /// Underlying read or parse failure
    #[source]
    pub cause: EsgSheetError,
}

impl ExtractionError {
    pub fn new(site: &str, cause: EsgSheetError) -> Self {
        Self {
            site: site.to_owned(),
            cause,
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, EsgSheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| EsgSheetError::WithContextError(format!("{}: {}", message, e)))
    }
}
