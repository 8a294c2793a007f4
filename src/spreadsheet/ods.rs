use crate::error::EsgSheetError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::reference::MAX_COLUMNS;
use crate::spreadsheet::reference::MAX_ROWS;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::sheet::Table;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use log::debug;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::io::Read;
use std::io::Seek;
use thiserror::Error;
use zip::ZipArchive;

/// ODS file MIME type identifier
const MIME_TYPE: &[u8] = b"application/vnd.oasis.opendocument.spreadsheet";
/// XML element name for spreadsheet root
const SPREADSHEET: QName = QName(b"office:spreadsheet");
/// XML element name for table (sheet)
const TABLE: QName = QName(b"table:table");
/// XML element name for table row
const TABLE_ROW: QName = QName(b"table:table-row");
/// XML element name for table cell
const TABLE_CELL: QName = QName(b"table:table-cell");
/// XML element name for covered table cell (merged cells)
const TABLE_COVERED_CELL: QName = QName(b"table:covered-table-cell");
/// XML element name for annotations (comments)
const ANNOTATION: QName = QName(b"office:annotation");
/// XML element name for paragraph text
const PARAGRAPH: QName = QName(b"text:p");
/// XML element name for string (space) text
const STRING: QName = QName(b"text:s");
/// Most cells a single repeated element may expand to
const MAX_REPEATED_CELLS: usize = 1 << 18;

/// Error types specific to ODS spreadsheet processing
#[derive(Error, Debug)]
pub enum OdsError {
    /// Invalid ODS MIME type detected in file
    #[error("Invalid ODS MIME type")]
    MimeTypeError,
    /// A non-empty cell repeated over too large an area
    #[error("Cell repeated {0} times in table '{1}'")]
    RepeatedCellError(usize, String),
}

/// An OpenDocument spreadsheet held in memory.
pub(crate) struct OdsSpreadsheet<R: Read + Seek> {
    /// Name of the ODS file
    name: String,
    /// ZIP archive containing the document parts
    zip: ZipArchive<R>,
    /// Table names in document order
    sheets: Vec<String>,
}

impl<R: Read + Seek> OdsSpreadsheet<R> {
    /// Validates the archive and lists its tables.
    pub(crate) fn from_archive(name: &str, mut zip: ZipArchive<R>) -> Result<Self, EsgSheetError> {
        check_mime(&mut zip)?;
        if is_password_protected(&mut zip)? {
            Err(SpreadsheetError::PasswordProtected(name.to_owned()))?;
        }
        let sheets = load_sheet_names(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::EmptyWorkbook(name.to_owned()))?
        }
        Ok(OdsSpreadsheet {
            name: name.to_owned(),
            zip,
            sheets,
        })
    }
}

impl<R: Read + Seek> Spreadsheet for OdsSpreadsheet<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.clone()
    }

    /// Reads the tables accepted by `criteria` from `content.xml`.
    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Table>, EsgSheetError> {
        let mut tables = Vec::<Table>::new();
        let mut sheet_name = String::new();
        let mut reader = self.zip
            .xml_reader("content.xml")?
            .ok_or_else(|| SpreadsheetError::FileError("content.xml".to_owned()))?;
        'sheets: loop {
            if criteria.is_exhausted(tables.len()) {
                break;
            }
            // Advance to the next accepted table
            let mut found = false;
            match_xml_events!(reader => {
                Event::End(event) if event.name() == SPREADSHEET => break,
                Event::Start(event) if event.name() == TABLE => {
                    let table_name = event.get_attribute_value("table:name")?.unwrap_or_default();
                    if criteria.accept(&table_name) {
                        sheet_name.clear();
                        sheet_name.push_str(&table_name);
                        found = true;
                        break;
                    }
                }
            });
            if !found {
                break 'sheets;
            }

            let mut sheet = Sheet::new(&sheet_name);
            let mut row = 0usize;
            let mut col = 0usize;
            let mut row_count = 1usize;
            let mut col_count = 1usize;
            let mut kind = CellType::default();
            let mut value = String::new();
            // Only string cells collect paragraph text
            let mut element_context = false;
            let mut comment_context = false;
            match_xml_events!(reader => {
                Event::End(event) if event.name() == TABLE => break,
                Event::Start(event) if event.name() == TABLE_ROW => {
                    row_count = event.parse_attribute_value("table:number-rows-repeated")?.unwrap_or(1);
                    col = 0;
                }
                Event::End(event) if event.name() == TABLE_ROW => {
                    row = row.saturating_add(row_count);
                }
                Event::Start(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                    value.clear();
                    col_count = event.parse_attribute_value("table:number-columns-repeated")?.unwrap_or(1);
                    element_context = false;
                    kind = match event.get_attribute_value("office:value-type")? {
                        Some(value_type) => match value_type.as_ref() {
                            "boolean" => {
                                let is_true = event.get_attribute_value("office:boolean-value")?
                                    .map(|cow| cow != "false" && cow != "0")
                                    .unwrap_or(false);
                                value.push_str(if is_true { "1" } else { "0" });
                                CellType::Boolean
                            }
                            "date" => {
                                if let Some(data) = event.get_attribute_value("office:date-value")? {
                                    value.push_str(&data);
                                }
                                CellType::IsoDateTime
                            }
                            "time" => {
                                if let Some(data) = event.get_attribute_value("office:time-value")? {
                                    value.push_str(&data);
                                }
                                CellType::IsoDuration
                            }
                            "string" => {
                                element_context = true;
                                let is_error = event.get_attribute_value("calcext:value-type")?
                                    .map(|cow| cow == "error")
                                    .unwrap_or(false);
                                if is_error { CellType::Error } else { CellType::InlineString }
                            }
                            _ => {
                                if let Some(data) = event.get_attribute_value("office:value")? {
                                    value.push_str(&data);
                                }
                                CellType::Number
                            }
                        },
                        None => CellType::Empty,
                    };
                }
                Event::End(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                    if kind != CellType::Empty && !value.is_empty() {
                        let rows = row_count.min(MAX_ROWS.saturating_sub(row));
                        let cols = col_count.min(MAX_COLUMNS.saturating_sub(col));
                        if rows.saturating_mul(cols) > MAX_REPEATED_CELLS {
                            Err(OdsError::RepeatedCellError(rows.saturating_mul(cols), sheet.name.to_owned()))?;
                        }
                        for row_offset in 0..rows {
                            for col_offset in 0..cols {
                                sheet.push(Cell {
                                    row: row + row_offset,
                                    col: col + col_offset,
                                    kind,
                                    value: value.to_owned(),
                                });
                            }
                        }
                    }
                    col = col.saturating_add(col_count);
                    kind = CellType::Empty;
                    element_context = false;
                    comment_context = false;
                }
                Event::Start(event) if element_context && event.name() == ANNOTATION => comment_context = true,
                Event::End(event) if element_context && comment_context && event.name() == ANNOTATION => comment_context = false,
                Event::Start(event) if element_context && !comment_context && event.name() == PARAGRAPH => {
                    if !value.is_empty() {
                        value.push('\n');
                    }
                }
                Event::Start(event) if element_context && !comment_context && event.name() == STRING => {
                    let count = event.parse_attribute_value("text:c")?.unwrap_or(1);
                    for _ in 0..count {
                        value.push(' ');
                    }
                }
                Event::Text(event) if element_context && !comment_context => value.push_bytes_text(&event)?,
                Event::GeneralRef(event) if element_context && !comment_context => value.push_bytes_ref(&event)?,
            });
            debug!("Read table '{}' of '{}'", sheet.name, self.name);
            tables.push(sheet.finish(&[]));
        }

        Ok(tables)
    }
}

/// Lists table names from `content.xml` without reading any cell.
fn load_sheet_names<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<Vec<String>, EsgSheetError> {
    let mut reader = zip
        .xml_reader("content.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("content.xml".to_owned()))?;
    let mut names = Vec::<String>::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TABLE => {
            if let Some(name) = event.get_attribute_value("table:name")? {
                names.push(name.to_string());
            }
        }
    });
    Ok(names)
}

/// Validates the `mimetype` entry of the archive.
fn check_mime<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<(), EsgSheetError> {
    if let Some(file) = &mut zip.file("mimetype")? {
        let mut buffer = Vec::<u8>::with_capacity(MIME_TYPE.len());
        file.read_to_end(&mut buffer)?;
        if buffer.trim_ascii() != MIME_TYPE {
            Err(OdsError::MimeTypeError)?;
        }
    }
    Ok(())
}

/// Checks the manifest for encryption data.
fn is_password_protected<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<bool, EsgSheetError> {
    let mut reader = match zip.xml_reader("META-INF/manifest.xml")? {
        Some(reader) => reader,
        None => return Ok(false),
    };
    let mut in_file_entry = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == QName(b"manifest:file-entry") => in_file_entry = true,
        Event::Start(event) if in_file_entry && event.name() == QName(b"manifest:encryption-data") => {
            return Ok(true);
        }
    });
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellValue;
    use crate::spreadsheet::fixtures;
    use std::io::Cursor;

    const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
<office:body><office:spreadsheet>
<table:table table:name="Cover"><table:table-row><table:table-cell office:value-type="string"><text:p>ESG report</text:p></table:table-cell></table:table-row></table:table>
<table:table table:name="Data">
<table:table-row>
<table:table-cell table:number-columns-repeated="2"/>
<table:table-cell office:value-type="string"><text:p>Water<text:s/>supply</text:p><office:annotation><text:p>note</text:p></office:annotation></table:table-cell>
<table:table-cell table:number-columns-repeated="2"/>
<table:table-cell office:value-type="float" office:value="8500"/>
<table:table-cell office:value-type="string"><text:p>120 KL</text:p></table:table-cell>
<table:table-cell office:value-type="date" office:date-value="2025-07-01"/>
</table:table-row>
<table:table-row table:number-rows-repeated="1048570"><table:table-cell table:number-columns-repeated="1024"/></table:table-row>
</table:table>
</office:spreadsheet></office:body></office:document-content>"#;

    fn open() -> OdsSpreadsheet<Cursor<Vec<u8>>> {
        let bytes = fixtures::ods(CONTENT);
        let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        OdsSpreadsheet::from_archive("site.ods", zip).unwrap()
    }

    #[test]
    fn list_table_names() {
        assert_eq!(open().sheet_names(), vec!["Cover", "Data"]);
    }

    #[test]
    fn read_typed_cells() {
        let mut spreadsheet = open();
        let tables = spreadsheet.read_sheets(&Criteria::only("Data")).unwrap();
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.name(), "Data");
        assert_eq!(table.height(), 1);
        assert_eq!(table.width(), 8);
        assert_eq!(table.cell(0, 2), Some(&CellValue::Text("Water supply".to_owned())));
        assert_eq!(table.cell(0, 5), Some(&CellValue::Number(8500.0)));
        assert_eq!(table.cell(0, 6), Some(&CellValue::Text("120 KL".to_owned())));
        assert!(matches!(table.cell(0, 7), Some(CellValue::Date(_))));
    }

    #[test]
    fn read_all_tables() {
        let mut spreadsheet = open();
        let tables = spreadsheet.read_sheets(&Criteria::default()).unwrap();
        let names: Vec<&str> = tables.iter().map(Table::name).collect();
        assert_eq!(names, vec!["Cover", "Data"]);
    }

    #[test]
    fn reject_wrong_mime_type() {
        let bytes = fixtures::zip(&[("mimetype", "text/plain"), ("content.xml", CONTENT)]);
        let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(OdsSpreadsheet::from_archive("site.ods", zip).is_err());
    }

    fn data_table(rows: &str) -> String {
        format!(
            r#"<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"><office:body><office:spreadsheet><table:table table:name="Data">{}</table:table></office:spreadsheet></office:body></office:document-content>"#,
            rows
        )
    }

    fn read_data(rows: &str) -> Result<Table, EsgSheetError> {
        let bytes = fixtures::ods(&data_table(rows));
        let zip = ZipArchive::new(Cursor::new(bytes))?;
        let mut spreadsheet = OdsSpreadsheet::from_archive("site.ods", zip)?;
        Ok(spreadsheet.read_sheets(&Criteria::default())?.remove(0))
    }

    #[test]
    fn expand_repeated_values() -> Result<(), EsgSheetError> {
        let table = read_data(
            r#"<table:table-row table:number-rows-repeated="2"><table:table-cell office:value-type="float" office:value="7" table:number-columns-repeated="3"/></table:table-row>"#,
        )?;
        assert_eq!((table.height(), table.width()), (2, 3));
        assert_eq!(table.cell(1, 2), Some(&CellValue::Number(7.0)));
        Ok(())
    }

    #[test]
    fn repeats_stop_at_the_grid_edge() -> Result<(), EsgSheetError> {
        let table = read_data(
            r#"<table:table-row table:number-rows-repeated="1048575"><table:table-cell/></table:table-row>
<table:table-row table:number-rows-repeated="4"><table:table-cell table:number-columns-repeated="16383"/><table:table-cell office:value-type="float" office:value="1" table:number-columns-repeated="9"/></table:table-row>
<table:table-row><table:table-cell office:value-type="float" office:value="2"/></table:table-row>"#,
        )?;
        assert_eq!((table.height(), table.width()), (MAX_ROWS, MAX_COLUMNS));
        assert_eq!(table.cell(MAX_ROWS - 1, MAX_COLUMNS - 1), Some(&CellValue::Number(1.0)));
        assert!(table.rows()[..MAX_ROWS - 1].iter().all(Vec::is_empty));
        Ok(())
    }

    #[test]
    fn reject_huge_repeated_value() {
        let result = read_data(
            r#"<table:table-row table:number-rows-repeated="1048576"><table:table-cell office:value-type="string" table:number-columns-repeated="16384"><text:p>x</text:p></table:table-cell></table:table-row>"#,
        );
        assert!(matches!(result, Err(EsgSheetError::OdsError(OdsError::RepeatedCellError(_, _)))));
    }
}
