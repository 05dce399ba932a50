//! `spacebio` — command-line client for the space biology knowledge engine.
//!
//! Run with: cargo run -p spacebio-cli -- --help

mod cli;
mod commands;
mod render;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("spacebio=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = spacebio_config::Config::load()?;
    config.apply_overrides(cli.api_base.clone(), None);
    config.validate()?;
    debug!(?config, "Configuration loaded");

    commands::run(cli, config).await
}
