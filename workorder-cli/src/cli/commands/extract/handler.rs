//! Extract command handler

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::*;
use dialoguer::Input;

use super::ExtractCommands;
use crate::config::ExtractConfig;
use crate::extract::excel::has_workbook_extension;
use crate::extract::{
    ExtractError, ExtractionReport, FolderSink, ZipSink, load_dataset, run_extraction,
    run_extracts,
};

/// Handle the extract command
pub fn handle_extract_command(args: ExtractCommands) -> Result<()> {
    let input = match args.input {
        Some(path) => path,
        None => match prompt_for_input()? {
            Some(path) => path,
            None => {
                println!("{}", "No file selected. Nothing was extracted.".yellow());
                return Ok(());
            }
        },
    };

    let file_name = input.display().to_string();
    if !has_workbook_extension(&file_name) {
        return Err(ExtractError::UnsupportedInput(file_name).into());
    }
    if !input.is_file() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let config = ExtractConfig::load_or_default(args.rules.as_deref())?;

    println!("Reading: {}", input.display().to_string().cyan());

    match args.zip {
        Some(zip_path) => {
            let mut sink = ZipSink::new();
            let report = run_extraction(&input, &config, &mut sink)?;
            let bytes = sink.finish()?;
            fs::write(&zip_path, bytes)
                .with_context(|| format!("Failed to write archive: {}", zip_path.display()))?;
            print_summary(&report, &zip_path);
        }
        None => {
            // Load before creating the folder so a bad workbook leaves nothing behind
            let dataset = load_dataset(&input, &config)?;
            let mut sink = FolderSink::create_beside(&input)?;
            let report = run_extracts(&dataset, &config, &mut sink)?;
            print_summary(&report, sink.dir());
        }
    }

    Ok(())
}

/// Ask for the workbook path; None when the user leaves it empty
fn prompt_for_input() -> Result<Option<PathBuf>> {
    let answer: String = Input::new()
        .with_prompt("Work order workbook (.xlsx)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read input path")?;

    Ok(parse_prompt_answer(&answer))
}

/// Turn a prompt answer into a path, stripping whitespace and surrounding quotes
fn parse_prompt_answer(answer: &str) -> Option<PathBuf> {
    let trimmed = answer.trim().trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

fn print_summary(report: &ExtractionReport, destination: &Path) {
    println!();
    println!("{}", "Extraction complete!".bright_green().bold());
    println!(
        "  {} rows read, {} matched the customer filter",
        report.input_rows, report.filtered_rows
    );
    for output in &report.outputs {
        println!("  {} ({} rows)", output.file_name, output.rows);
    }
    println!(
        "Files saved to: {}",
        destination.display().to_string().bright_green()
    );
}
