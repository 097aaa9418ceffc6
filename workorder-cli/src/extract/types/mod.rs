//! Core types for work order extraction

mod cell;
mod dataset;
mod rule;

pub use cell::{Cell, format_number, serial_to_datetime};
pub use dataset::{Dataset, Record};
pub use rule::{ExtractRule, FilterRule};
