//! Main application entry point (binary).
//!
//! This is a thin wrapper around the `http_response_collector` library that handles:
//! - Environment variable loading (.env file)
//! - Flag and environment parsing
//! - Logger initialization
//!
//! All request handling is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use http_response_collector::initialization::init_logger_with;
use http_response_collector::{run_server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal in deployed environments
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Err(e) = run_server(config).await {
        log::error!("Fatal: {:#}", e);
        eprintln!("http_response_collector error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
