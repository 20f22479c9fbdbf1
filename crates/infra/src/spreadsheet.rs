//! Spreadsheet readers: first sheet, values only, header row first.
//!
//! Workbooks (`xlsx`, `xlsm`, `xls`, `ods`) go through `calamine`; `csv` goes
//! through the `csv` crate with every field read as text.
//!
//! Returned rows are positional: index `i` is sheet row `i + 1` (CSV line
//! `i + 1`). Rows the underlying reader skips come back as empty rows.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader};
use thiserror::Error;

use itemtrack_inventory::CellValue;

/// Declared upload formats, chosen by file extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Xlsm,
    Xls,
    Ods,
    Csv,
}

impl SheetFormat {
    pub const EXTENSIONS: [&'static str; 5] = ["xlsx", "xlsm", "xls", "ods", "csv"];

    /// Format for a file name, by case-insensitive extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, SpreadsheetError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Ok(SheetFormat::Xlsx),
            "xlsm" => Ok(SheetFormat::Xlsm),
            "xls" => Ok(SheetFormat::Xls),
            "ods" => Ok(SheetFormat::Ods),
            "csv" => Ok(SheetFormat::Csv),
            _ => Err(SpreadsheetError::UnsupportedFormat(extension)),
        }
    }

    fn is_workbook(&self) -> bool {
        !matches!(self, SheetFormat::Csv)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpreadsheetError {
    /// The extension is not one of [`SheetFormat::EXTENSIONS`].
    #[error(
        "unsupported file format '{0}' (expected one of: {})",
        SheetFormat::EXTENSIONS.join(", ")
    )]
    UnsupportedFormat(String),

    /// The bytes could not be read in the declared format.
    #[error("{0}")]
    Unreadable(String),
}

/// Read the first sheet of `bytes` as rows of cells.
///
/// A workbook without sheets, or with an empty first sheet, yields no rows.
pub fn read_first_sheet(
    format: SheetFormat,
    bytes: &[u8],
) -> Result<Vec<Vec<CellValue>>, SpreadsheetError> {
    if format.is_workbook() {
        read_workbook(bytes)
    } else {
        read_csv(bytes)
    }
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, SpreadsheetError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?,
        None => return Ok(Vec::new()),
    };

    // The range starts at the first used cell, not at A1.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let leading_cells = vec![CellValue::Empty; start_col as usize];

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    rows.extend(range.rows().map(|row| {
        leading_cells
            .iter()
            .cloned()
            .chain(row.iter().map(cell_from_data))
            .collect()
    }));
    Ok(rows)
}

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, SpreadsheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;

        // Blank lines never produce a record; keep their row slots.
        let line = record
            .position()
            .map_or(rows.len() + 1, |pos| pos.line() as usize);
        while rows.len() + 1 < line {
            rows.push(Vec::new());
        }

        rows.push(record.iter().map(CellValue::from).collect());
    }
    Ok(rows)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::text(b.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
    }
}
