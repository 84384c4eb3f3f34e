//! CLI module for Store API
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply (or revert) the PostgreSQL schema

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::observability::init_tracing;

/// Store API - posts, comments and likes with email-confirmed accounts
#[derive(Parser)]
#[command(name = "storeapi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),
}

/// Load `.env` and layered configuration, then install the log subscriber
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging, &config.observability.tracing);

    Ok(config)
}
