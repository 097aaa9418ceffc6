//! In-memory workbook fixtures for tests

use rust_xlsxwriter::{Format, Workbook};

use super::types::Cell;

/// Build an xlsx workbook from named sheets of string rows (first row = header)
///
/// Empty strings leave the cell blank.
pub fn workbook_bytes(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let typed: Vec<(&str, Vec<Vec<Cell>>)> = sheets
        .iter()
        .map(|(name, rows)| {
            let rows = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|v| if v.is_empty() { Cell::Empty } else { Cell::from(*v) })
                        .collect()
                })
                .collect();
            (*name, rows)
        })
        .collect();

    typed_workbook_bytes(&typed)
}

/// Build an xlsx workbook from named sheets of typed cells
pub fn typed_workbook_bytes(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();

        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        sheet.write_string(r, c, s).unwrap();
                    }
                    Cell::Number(n) => {
                        sheet.write_number(r, c, *n).unwrap();
                    }
                    Cell::DateTime(serial) => {
                        sheet
                            .write_number_with_format(r, c, *serial, &date_format)
                            .unwrap();
                    }
                    Cell::Bool(b) => {
                        sheet.write_boolean(r, c, *b).unwrap();
                    }
                }
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Header row used by the work order fixtures (raw, before normalization)
pub const ORDER_HEADERS: [&str; 10] = [
    "WorkOrderNumber",
    "CustomerName",
    "CustomerAddress",
    "CustomerContact",
    "CustomerType\u{a0}",
    " CustomerSubType",
    "SkillSet",
    "DelayReason",
    "DelayNotes",
    "LastUpdateDate",
];
