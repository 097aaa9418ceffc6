//! Column and value normalization for raw sheet data
//!
//! Sheets are normalized into one [`Dataset`]:
//! - header names lose non-breaking spaces, surrounding whitespace and case,
//!   and spaces become underscores
//! - columns holding any text are stringified and trimmed throughout
//! - the work order identity column is forward-filled over blank cells

use std::collections::HashMap;

use super::error::ExtractError;
use super::excel::RawSheet;
use super::types::{Cell, Dataset};

/// Literal text treated as a blank identity value
const NAN_TEXT: &str = "nan";

/// Normalize a header name: `"\u{a0}Work Order Number "` -> `"work_order_number"`
pub fn normalize_column_name(name: &str) -> String {
    name.replace('\u{a0}', " ")
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Normalize a sheet's header row into unique column names
///
/// Blank headers become `unnamed:_{index}`. Repeated names get `.1`, `.2`, ...
/// on later occurrences.
pub fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (idx, name) in raw.iter().enumerate() {
        let base = if name.replace('\u{a0}', " ").trim().is_empty() {
            normalize_column_name(&format!("Unnamed: {}", idx))
        } else {
            normalize_column_name(name)
        };

        let mut candidate = base.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}.{}", base, count);
        }
        seen.insert(candidate.clone(), 0);
        headers.push(candidate);
    }

    headers
}

/// Concatenate sheets (in order) into one dataset with normalized columns and values
pub fn build_dataset(sheets: Vec<RawSheet>) -> Dataset {
    let mut dataset = Dataset::default();

    for sheet in sheets {
        let columns = normalize_headers(&sheet.headers);
        log::debug!(
            "Sheet '{}': {} columns, {} rows",
            sheet.name,
            columns.len(),
            sheet.rows.len()
        );
        dataset.append(Dataset::from_rows(columns, sheet.rows));
    }

    normalize_values(&mut dataset);
    dataset
}

/// Stringify and trim every column that contains at least one text cell
///
/// Columns without text (numbers, dates, booleans) keep their native cells.
pub fn normalize_values(dataset: &mut Dataset) {
    let text_columns: Vec<String> = dataset
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| dataset.rows().iter().any(|row| row[*idx].is_text()))
        .map(|(_, name)| name.clone())
        .collect();

    for column in &text_columns {
        if let Some(cells) = dataset.column_cells_mut(column) {
            for cell in cells {
                *cell = std::mem::take(cell).into_trimmed_text();
            }
        }
    }
}

/// Check whether an identity cell counts as blank
fn is_blank_identity(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Text(s) => s == NAN_TEXT,
        _ => false,
    }
}

/// Forward-fill `column` over blank cells, in dataset order
///
/// Blank means empty or the literal text `nan`. Leading blanks have nothing to
/// copy and stay empty.
pub fn forward_fill(dataset: &mut Dataset, column: &str) -> Result<usize, ExtractError> {
    let cells = dataset
        .column_cells_mut(column)
        .ok_or_else(|| ExtractError::MissingColumn(column.to_string()))?;

    let mut last: Option<Cell> = None;
    let mut filled = 0;

    for cell in cells {
        if is_blank_identity(cell) {
            *cell = match &last {
                Some(value) => {
                    filled += 1;
                    value.clone()
                }
                None => Cell::Empty,
            };
        } else {
            last = Some(cell.clone());
        }
    }

    Ok(filled)
}
