//! Command-line interface definition

pub mod commands;

use clap::{Parser, Subcommand};

use commands::extract::ExtractCommands;
use commands::rules::RulesCommands;
use commands::serve::ServeCommands;

#[derive(Parser, Debug)]
#[command(name = "workorder-cli")]
#[command(about = "Split a work order workbook into per-skillset delay extracts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a workbook into an Extracted folder beside it (or a zip archive)
    Extract(ExtractCommands),
    /// Serve the upload/download web page
    Serve(ServeCommands),
    /// Print the effective extract rules as TOML
    Rules(RulesCommands),
}
