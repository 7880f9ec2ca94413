//! Row parsing for uploaded candidate files
//!
//! Turns raw file bytes into header-keyed [`RawRow`]s:
//! - CSV: first record is the header, blank lines are skipped, ragged rows
//!   abort the whole import
//! - Spreadsheet (xls/xlsx): first sheet by position, empty cells become `""`

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::debug;

use crate::error::ImportError;
use crate::types::{FileFormat, RawRow};

/// UTF-8 BOM bytes.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parser variant chosen by the format detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowParser {
    Csv,
    Spreadsheet,
}

impl From<FileFormat> for RowParser {
    fn from(format: FileFormat) -> Self {
        match format {
            FileFormat::Csv => RowParser::Csv,
            FileFormat::Spreadsheet => RowParser::Spreadsheet,
        }
    }
}

impl RowParser {
    /// Parse the whole buffer. The buffer is consumed and freed on return.
    pub fn parse(&self, bytes: Vec<u8>) -> Result<Vec<RawRow>, ImportError> {
        let rows = match self {
            RowParser::Csv => parse_csv(&bytes)?,
            RowParser::Spreadsheet => parse_spreadsheet(bytes)?,
        };

        if rows.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        debug!("Parsed {} data rows ({:?})", rows.len(), self);
        Ok(rows)
    }
}

fn parse_error(e: impl std::fmt::Display) -> ImportError {
    ImportError::ParseError(e.to_string())
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRow>, ImportError> {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    check_quoting(content)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = reader.headers().map_err(parse_error)?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(parse_error)?;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);

        if record.len() != headers.len() {
            return Err(ImportError::ParseError(format!(
                "line {}: expected {} fields, found {}",
                line,
                headers.len(),
                record.len()
            )));
        }

        let mut row = RawRow::new(line);
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header, value);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// The csv reader tolerates broken quoting and silently merges or reshapes
/// rows. Reject text after a closing quote and quoted fields left open at
/// end of input.
fn check_quoting(content: &[u8]) -> Result<(), ImportError> {
    let mut line = 1;
    let mut at_field_start = true;
    // Line where the open quoted field started
    let mut open_quote: Option<usize> = None;

    let mut i = 0;
    while i < content.len() {
        let byte = content[i];
        if open_quote.is_some() {
            match byte {
                b'"' => match content.get(i + 1) {
                    // Escaped quote
                    Some(b'"') => i += 1,
                    None | Some(b',') | Some(b'\n') | Some(b'\r') => {
                        open_quote = None;
                        at_field_start = false;
                    }
                    Some(_) => {
                        return Err(ImportError::ParseError(format!(
                            "line {}: unexpected text after closing quote",
                            line
                        )));
                    }
                },
                b'\n' => line += 1,
                _ => {}
            }
        } else {
            match byte {
                b'"' if at_field_start => open_quote = Some(line),
                b',' | b'\r' => at_field_start = true,
                b'\n' => {
                    line += 1;
                    at_field_start = true;
                }
                _ => at_field_start = false,
            }
        }
        i += 1;
    }

    match open_quote {
        Some(start) => Err(ImportError::ParseError(format!(
            "line {}: unterminated quoted field",
            start
        ))),
        None => Ok(()),
    }
}

fn parse_spreadsheet(bytes: Vec<u8>) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(parse_error)?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(parse_error)?,
        None => return Err(ImportError::EmptyFile),
    };

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut sheet_rows = range.rows();

    let headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for (idx, cells) in sheet_rows.enumerate() {
        // 1-based sheet row; header sits at first_row + 1
        let mut row = RawRow::new(first_row + idx + 2);
        for (col, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = cells.get(col).map(cell_to_string).unwrap_or_default();
            row.insert(header, &value);
        }

        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        // Phone numbers typed into Excel come back as floats
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
