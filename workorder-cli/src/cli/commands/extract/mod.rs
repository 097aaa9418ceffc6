//! `extract` command: folder mode (default) or archive file

mod handler;

use std::path::PathBuf;

use clap::Args;

pub use handler::handle_extract_command;

#[derive(Args, Debug)]
pub struct ExtractCommands {
    /// Work order workbook (.xlsx); prompts for a path when omitted
    pub input: Option<PathBuf>,

    /// Write all extracts into this zip archive instead of an Extracted folder
    #[arg(long, value_name = "FILE")]
    pub zip: Option<PathBuf>,

    /// TOML file replacing the built-in filter and extract rules
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}
