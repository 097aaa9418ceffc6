//! Write one extract to an xlsx workbook with auto-fitted columns
//!
//! The workbook is rendered twice: the first pass is reopened to measure the
//! rendered width of every column, the second pass applies those widths.

use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::extract::types::{Cell, Dataset, format_number, serial_to_datetime};

/// Padding added to the widest cell of each column
const WIDTH_PADDING: usize = 2;

/// Number format used for date cells
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Render an extract to xlsx bytes with auto-fitted column widths
pub fn write_extract(dataset: &Dataset) -> Result<Vec<u8>> {
    let draft = render_workbook(dataset, None)?;
    let widths = measure_column_widths(&draft)?;
    log::debug!("Column widths: {:?}", widths);
    render_workbook(dataset, Some(&widths))
}

/// Render the dataset as a single-sheet workbook (header row + data rows)
pub fn render_workbook(dataset: &Dataset, widths: Option<&[f64]>) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format(DATETIME_FORMAT);

    for (col, name) in dataset.columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (row_idx, row) in dataset.rows().iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_num, col as u16, cell, &date_format)?;
        }
    }

    if let Some(widths) = widths {
        for (col, width) in widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }
    }

    workbook
        .save_to_buffer()
        .context("Failed to render extract workbook")
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    date_format: &Format,
) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        Cell::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        Cell::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Cell::DateTime(serial) => {
            worksheet.write_number_with_format(row, col, *serial, date_format)?;
        }
    }
    Ok(())
}

/// Reopen rendered xlsx bytes and compute each column's display width
///
/// Width is the character count of the longest rendered cell (header
/// included) plus padding. Empty cells and cells that cannot be rendered as
/// text (error values) are ignored.
pub fn measure_column_widths(bytes: &[u8]) -> Result<Vec<f64>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .context("Failed to reopen rendered workbook")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Rendered workbook has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    // Columns before the used range start (none for our own output) still need a slot
    let offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let mut max_lengths: Vec<usize> = vec![0; offset + range.width()];

    for row in range.rows() {
        for (idx, cell) in row.iter().enumerate() {
            let Some(text) = cell_text(cell) else {
                continue;
            };
            let slot = &mut max_lengths[offset + idx];
            *slot = (*slot).max(text.chars().count());
        }
    }

    Ok(max_lengths
        .into_iter()
        .map(|len| (len + WIDTH_PADDING) as f64)
        .collect())
}

/// Rendered text of a cell, or None when it has nothing to measure
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_number(*f)),
        Data::Bool(b) => Some(Cell::Bool(*b).display()),
        Data::DateTime(dt) => match serial_to_datetime(dt.as_f64()) {
            Some(value) if dt.is_datetime() => Some(value.format("%Y-%m-%d %H:%M:%S").to_string()),
            _ => Some(format_number(dt.as_f64())),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}
