//! CLI flags and environment fallbacks.

use anyhow::{Context, Result};
use clap::Parser;

/// Live terminal gauge for power-generation readings.
#[derive(Parser, Debug)]
#[command(name = "wattdash", version, about)]
pub struct Cli {
    /// Base URL of the readings API (falls back to WATTDASH_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// API key sent as `x-api-key` (falls back to WATTDASH_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,
}

/// Resolved runtime configuration.
///
/// Everything that talks to the network receives this explicitly;
/// nothing below `main` reads the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Config {
    /// Merge CLI flags with their environment fallbacks.
    pub fn resolve(cli: Cli) -> Result<Self> {
        let base_url = cli
            .base_url
            .or_else(|| std::env::var("WATTDASH_BASE_URL").ok())
            .context("no base URL: pass --base-url or set WATTDASH_BASE_URL")?;
        let api_key = cli
            .api_key
            .or_else(|| std::env::var("WATTDASH_API_KEY").ok());
        Ok(Self { base_url, api_key })
    }
}
