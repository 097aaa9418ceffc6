//! Work order extraction
//!
//! Splits a multi-sheet work order workbook into one spreadsheet per
//! (skillset, delay reason) extract rule.

pub mod error;
pub mod excel;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod sink;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::ExtractError;
pub use pipeline::{ExtractionReport, extract_to_archive, load_dataset, run_extraction, run_extracts};
pub use sink::{ARCHIVE_FILE_NAME, FolderSink, ZipSink};
pub use types::{ExtractRule, FilterRule};
