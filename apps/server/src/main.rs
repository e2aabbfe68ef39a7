pub mod config;
pub mod web;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::parse_config;
use crate::web::create_web_server;

/// Serves the heater timer form and its calculation API.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// TOML config file; defaults apply when it does not exist.
    #[arg(short, long, default_value = "heater-timer.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = parse_config(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    info!(
        "default timer reference {}, pages from {}",
        config.default_reference, config.static_dir
    );

    create_web_server(Arc::new(config)).await
}
