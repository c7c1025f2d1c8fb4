//! Command-line interface for strictly_connect.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Connect - real-time Connect Four over WebSocket
#[derive(Parser, Debug)]
#[command(name = "strictly_connect")]
#[command(about = "Real-time Connect Four session server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
