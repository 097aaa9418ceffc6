//! `serve` command: upload/download web page (archive mode)

mod handler;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;

pub use handler::handle_serve_command;

#[derive(Args, Debug)]
pub struct ServeCommands {
    /// Address to listen on
    #[arg(long, env = "WORKORDER_BIND", default_value = "127.0.0.1:8501")]
    pub bind: SocketAddr,

    /// TOML file replacing the built-in filter and extract rules
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}
