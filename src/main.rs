//! DiskAtlas: disk usage atlas for the terminal.
//!
//! Thin binary entry point. All logic lives in the `diskatlas-core`
//! and `diskatlas-cli` crates.

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = diskatlas_cli::Cli::parse();

    // Structured logging goes to stderr so stdout stays a clean report.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(roots = cli.roots.len(), "DiskAtlas starting");

    diskatlas_cli::run(cli)
}
