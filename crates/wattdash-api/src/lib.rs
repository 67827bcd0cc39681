//! Client library for a power-generation readings provider.
//!
//! Exposes a rate-limit-aware HTTP fetcher and the two queries the
//! dashboard needs: the maximum reading over a one-month look-back
//! window and the latest reading with its observation-window end.

pub mod client;
pub mod error;
pub mod readings;

pub use client::ApiClient;
pub use error::ApiError;
pub use readings::{parse_historical_max, parse_latest, Reading, HISTORY_PAGE_SIZE};
