//! Strictly Connect - command-line entry point.

use anyhow::Result;
use clap::Parser;
use strictly_connect::{Cli, Command, ServerConfig, serve};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    match cli.command {
        Command::Serve { config, host, port } => {
            let config = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            }
            .with_overrides(host, port);

            info!(addr = %config.bind_addr(), "Starting Strictly Connect server");
            serve(config).await
        }
    }
}
