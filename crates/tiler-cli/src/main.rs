// ABOUTME: Entry point for the tiler binary.
// ABOUTME: Parses arguments, sets up logging and config, then runs one subcommand.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tiler_core::Config;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default(),
    };
    tracing::debug!(
        "Divider thickness {}px, container {}x{}",
        config.layout.divider_thickness,
        config.width,
        config.height
    );

    let output = commands::run(&config, cli.command)?;
    println!("{output}");
    Ok(())
}
