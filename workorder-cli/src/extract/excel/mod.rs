//! Excel import of work order workbooks and export of extracts

pub mod reader;
pub mod writer;

pub use reader::{RawSheet, has_workbook_extension, read_workbook, read_workbook_bytes};
pub use writer::write_extract;
