//! Domain errors raised by the extraction pipeline
//!
//! Filter and rule columns that are missing are not errors (they simply match
//! nothing). Only structural problems with the input are reported here; I/O
//! failures travel as `anyhow` errors with context.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// A structurally required column is absent after normalization
    #[error("required column '{0}' not found in any sheet")]
    MissingColumn(String),

    /// No data rows across all sheets
    #[error("input spreadsheet contains no data rows")]
    EmptyInput,

    /// The input does not have the accepted extension
    #[error("unsupported input file '{0}': expected an .xlsx workbook")]
    UnsupportedInput(String),

    /// The extract configuration cannot be used
    #[error("invalid extract configuration: {0}")]
    InvalidConfig(String),
}
