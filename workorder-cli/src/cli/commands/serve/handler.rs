//! Serve command handler

use anyhow::Result;
use colored::*;

use super::ServeCommands;
use crate::config::ExtractConfig;
use crate::web;

/// Handle the serve command
pub async fn handle_serve_command(args: ServeCommands) -> Result<()> {
    let config = ExtractConfig::load_or_default(args.rules.as_deref())?;

    println!(
        "Open {} to upload a workbook (Ctrl-C to stop)",
        format!("http://{}", args.bind).bright_green()
    );

    web::serve(args.bind, config).await
}
