//! Error taxonomy for the readings API.

use thiserror::Error;

/// Failures surfaced by the API client.
///
/// Every variant is terminal at the point it occurs; only the fetcher's
/// internal rate-limit backoff ever retries, and it does so before
/// constructing one of these.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection failure, or a non-success status once the rate-limit
    /// retry budget is spent.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Success status with a blank or whitespace-only body.
    #[error("empty response body from {url}")]
    EmptyResponse { url: String },

    /// The body parsed (or failed to parse) but a required field is
    /// missing.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Well-formed historical reply that contains no observations, so
    /// there is no reference scale for the gauge.
    #[error("no historical readings in the look-back window")]
    HistoricalDataNotFound,
}
