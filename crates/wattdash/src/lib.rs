//! Terminal dashboard for live power-generation readings.
//!
//! Polls a readings endpoint every three minutes and redraws a
//! fixed-width gauge table once per second in between. The tick loop is
//! aligned to wall-clock seconds and stops cleanly on Esc or `q`.

pub mod app;
pub mod cancel;
pub mod config;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod state;

pub use app::run;
pub use config::{Cli, Config};
