//! `rules` command: dump the effective configuration as TOML

mod handler;

use std::path::PathBuf;

use clap::Args;

pub use handler::handle_rules_command;

#[derive(Args, Debug)]
pub struct RulesCommands {
    /// Start from this TOML file instead of the built-in rules (validates it)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Write the TOML to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
