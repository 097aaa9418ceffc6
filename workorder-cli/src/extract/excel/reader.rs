//! Read every sheet of a work order workbook

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook, open_workbook_from_rs};

use crate::extract::types::Cell;

/// Accepted workbook extension
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// Check a file name carries the accepted workbook extension (case-insensitive)
pub fn has_workbook_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(WORKBOOK_EXTENSION))
}

/// One sheet as read: raw header names and the data rows below them
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Read all sheets of an xlsx file, in workbook order
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<RawSheet>> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    read_sheets(&mut workbook)
}

/// Read all sheets of an in-memory xlsx workbook (e.g. an upload)
pub fn read_workbook_bytes(bytes: &[u8]) -> Result<Vec<RawSheet>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .context("Failed to open uploaded Excel workbook")?;

    read_sheets(&mut workbook)
}

fn read_sheets<RS>(workbook: &mut Xlsx<RS>) -> Result<Vec<RawSheet>>
where
    RS: std::io::Read + std::io::Seek,
{
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        let mut rows = range.rows();

        // First used row is the header
        let headers: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(header_text).collect(),
            None => {
                log::debug!("Skipping empty sheet '{}'", sheet_name);
                continue;
            }
        };

        let data: Vec<Vec<Cell>> = rows
            .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .collect();

        log::info!("Read sheet '{}' ({} rows)", sheet_name, data.len());

        sheets.push(RawSheet {
            name: sheet_name,
            headers,
            rows: data,
        });
    }

    Ok(sheets)
}

/// Header cells are always treated as names
fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => cell_from_data(other).display(),
    }
}

/// Convert an Excel cell to a [`Cell`]
pub fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_datetime() {
                Cell::DateTime(dt.as_f64())
            } else {
                Cell::Number(dt.as_f64())
            }
        }
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        // Error cells (#N/A, #REF!, ...) come through as their display text
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}
