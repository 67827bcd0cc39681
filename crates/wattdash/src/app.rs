//! Terminal session setup and the top-level run path.

use std::io;

use anyhow::{Context, Result};
use crossterm::{cursor, execute, terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wattdash_api::ApiClient;

use crate::cancel::Cancel;
use crate::config::{Cli, Config};
use crate::{input, scheduler};

/// Resolve configuration, take over the terminal, and run the
/// scheduler loop until cancellation or failure.
pub async fn run(cli: Cli) -> Result<()> {
    // The dashboard owns stdout, so logs go to stderr and stay silent
    // unless RUST_LOG asks for them.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::resolve(cli)?;
    info!(base_url = %config.base_url, "starting dashboard");
    let client = ApiClient::new(&config.base_url, config.api_key.clone());

    let cancel = Cancel::new();
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    execute!(io::stdout(), cursor::Hide).context("failed to hide cursor")?;

    let listener = tokio::task::spawn_blocking({
        let cancel = cancel.clone();
        move || input::listen(cancel)
    });

    let result = scheduler::run(&client, &cancel, &mut io::stdout()).await;

    // Restore the terminal whatever happened in the loop.
    let _ = execute!(io::stdout(), cursor::Show);
    let _ = terminal::disable_raw_mode();

    if result.is_ok() {
        // Clean exits only happen because the listener fired the
        // signal, so it has already returned.
        let _ = listener.await;
    }
    result
}
