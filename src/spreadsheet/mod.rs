//! # Spreadsheet Reading
//!
//! Turns the raw bytes of an uploaded workbook into a [`RawWorkbook`]: an
//! ordered list of [`Table`]s of [`CellValue`]s. Office Open XML
//! (`.xlsx`, `.xlsm`) and OpenDocument (`.ods`) containers are supported; the
//! format is detected from the archive content rather than the file name.
use crate::error::EsgSheetError;
use crate::helpers::zip::ZipHelper;
use std::io::Cursor;
use thiserror::Error;
use zip::ZipArchive;

pub(crate) mod cell;
pub(crate) mod criteria;
pub(crate) mod excel;
pub(crate) mod ods;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

pub use cell::CellValue;
pub use criteria::Criteria;
pub use sheet::Table;

use ods::OdsSpreadsheet;
use xlsx::XlsxSpreadsheet;

/// Signature of OLE2 compound files: legacy `.xls` and encrypted OOXML.
const COMPOUND_FILE_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Cannot detect spreadsheet format of '{0}'")]
    InvalidFileFormat(String),

    #[error("Unsupported spreadsheet format of '{0}': legacy .xls or password protected workbook")]
    UnsupportedFormat(String),

    #[error("Spreadsheet '{0}' is password protected")]
    PasswordProtected(String),

    #[error("Workbook '{0}' has no sheets")]
    EmptyWorkbook(String),

    #[error("Missing part '{0}' in spreadsheet archive")]
    FileError(String),
}

/// A readable spreadsheet document.
pub trait Spreadsheet {
    /// File name the document was opened with
    fn name(&self) -> &str;

    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Parses the sheets accepted by `criteria`, in workbook order
    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Table>, EsgSheetError>;
}

/// Opens a workbook held in memory.
///
/// `file_name` is only used for messages; the container decides the format.
pub fn open_spreadsheet<'a>(bytes: &'a [u8], file_name: &str) -> Result<Box<dyn Spreadsheet + 'a>, EsgSheetError> {
    if bytes.starts_with(COMPOUND_FILE_SIGNATURE) {
        Err(SpreadsheetError::UnsupportedFormat(file_name.to_owned()))?
    }
    let zip = ZipArchive::new(Cursor::new(bytes))
        .map_err(|_| SpreadsheetError::InvalidFileFormat(file_name.to_owned()))?;
    if zip.contains("mimetype") || zip.contains("content.xml") {
        Ok(Box::new(OdsSpreadsheet::from_archive(file_name, zip)?))
    } else if zip.contains("xl/workbook.xml") {
        Ok(Box::new(XlsxSpreadsheet::from_archive(file_name, zip)?))
    } else {
        Err(SpreadsheetError::InvalidFileFormat(file_name.to_owned()).into())
    }
}

/// Reads every sheet of a workbook held in memory.
pub fn read_workbook(bytes: &[u8], file_name: &str) -> Result<RawWorkbook, EsgSheetError> {
    read_workbook_with(bytes, file_name, &Criteria::default())
}

/// Reads the sheets of a workbook accepted by `criteria`.
pub fn read_workbook_with(bytes: &[u8], file_name: &str, criteria: &Criteria) -> Result<RawWorkbook, EsgSheetError> {
    let mut spreadsheet = open_spreadsheet(bytes, file_name)?;
    let mut workbook = RawWorkbook::new(file_name);
    for table in spreadsheet.read_sheets(criteria)? {
        workbook.push(table);
    }
    Ok(workbook)
}

/// Sheets of one workbook in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawWorkbook {
    file_name: String,
    sheets: Vec<Table>,
}

impl RawWorkbook {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            sheets: Vec::new(),
        }
    }

    /// Builds a workbook from tables, keeping their order.
    pub fn from_tables(file_name: &str, tables: Vec<Table>) -> Self {
        Self {
            file_name: file_name.to_owned(),
            sheets: tables,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Appends a sheet; a later sheet with an existing name replaces it in place.
    pub fn push(&mut self, table: Table) {
        match self.sheets.iter_mut().find(|sheet| sheet.name() == table.name()) {
            Some(sheet) => *sheet = table,
            None => self.sheets.push(table),
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets.iter().find(|sheet| sheet.name() == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Table::name).collect()
    }

    pub fn sheets(&self) -> &[Table] {
        &self.sheets
    }

    pub fn first(&self) -> Option<&Table> {
        self.sheets.first()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
