//! wattdash - live terminal gauge for power-generation readings.

use clap::Parser;
use owo_colors::OwoColorize;
use wattdash::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = wattdash::run(cli).await {
        // The input listener may still be blocked on a key read, so
        // exit the process directly instead of returning through the
        // runtime's shutdown.
        eprintln!("{} {:?}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
