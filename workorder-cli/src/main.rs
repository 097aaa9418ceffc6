mod cli;
mod config;
mod extract;
mod web;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use cli::commands::{extract::handle_extract_command, rules::handle_rules_command, serve::handle_serve_command};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => handle_extract_command(args),
        Commands::Serve(args) => handle_serve_command(args).await,
        Commands::Rules(args) => handle_rules_command(args),
    }
}
