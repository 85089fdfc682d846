// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "razer-battery")]
#[command(author, version, about = "Battery telemetry for Razer wireless mice")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/razer-battery/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List connected devices
    #[command(visible_aliases = ["ls", "l"])]
    List,

    /// Show battery level and charging state
    #[command(visible_aliases = ["bat", "b"])]
    Battery {
        /// Only this product id (e.g. 0x00AB or 171)
        #[arg(short, long, value_parser = parse_pid)]
        pid: Option<u16>,

        /// Print only the battery level
        #[arg(short, long)]
        quiet: bool,
    },

    /// Poll devices until interrupted, reporting connects and battery state
    #[command(visible_alias = "w")]
    Watch {
        /// Seconds between polls
        #[arg(short, long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },
}

/// Parse a product id given as hex (`0x00AB`) or decimal (`171`)
pub fn parse_pid(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|e| format!("invalid product id '{s}': {e}"))
}
