//! Razer wireless mouse battery CLI
//!
//! Reports battery level and charging state of connected Razer mice.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use razer_mouse::{DeviceRegistry, FlowControl};
use razer_transport::HidapiBackend;
use tracing::debug;

mod cli;
use cli::{Cli, Commands};

mod commands;
mod config;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    debug!("Loading config from {:?}", config_path);
    let config = Config::load(&config_path)?;

    let backend = HidapiBackend::new()
        .context("Failed to initialize HID API")?
        .with_usage_subdivided(config.usage_subdivided());
    let mut registry = DeviceRegistry::new(
        Arc::new(backend),
        config.catalog(),
        FlowControl::new(config.flow_config()),
    );

    match cli.command {
        Commands::List => commands::list(&mut registry),
        Commands::Battery { pid, quiet } => commands::battery(&mut registry, pid, quiet),
        Commands::Watch { interval } => commands::watch(&mut registry, interval),
    }
}
