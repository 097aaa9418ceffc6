//! Rules command handler

use std::fs;

use anyhow::{Context, Result};
use colored::*;

use super::RulesCommands;
use crate::config::ExtractConfig;

/// Handle the rules command
pub fn handle_rules_command(args: RulesCommands) -> Result<()> {
    let config = ExtractConfig::load_or_default(args.rules.as_deref())?;
    let text = config.to_toml()?;

    match args.output {
        Some(path) => {
            fs::write(&path, &text)
                .with_context(|| format!("Failed to write rules to: {}", path.display()))?;
            println!(
                "Rules saved to: {}",
                path.display().to_string().bright_green()
            );
        }
        None => print!("{}", text),
    }

    Ok(())
}
