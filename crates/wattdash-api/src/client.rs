//! Resilient single-endpoint fetch.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Retries allowed per call when the server rate-limits us.
const RATE_LIMIT_RETRIES: u32 = 2;

/// HTTP client for the readings provider.
///
/// The API key is injected at construction; nothing in here consults
/// the process environment.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `url` and return the body as a string.
    ///
    /// HTTP 429 is retried up to [`RATE_LIMIT_RETRIES`] times, sleeping
    /// for whatever whole-second delay the `Retry-After` header
    /// advertises; a 429 without a usable hint falls through to the
    /// normal status handling. Every other failure is terminal. The
    /// attempt counter is local to this call.
    pub async fn fetch(&self, url: &str) -> Result<String, ApiError> {
        let mut attempt = 0u32;
        loop {
            let mut request = self.http.get(url);
            if let Some(key) = &self.api_key {
                request = request.header("x-api-key", key);
            }

            let response = request
                .send()
                .await
                .map_err(|e| ApiError::Transport(format!("GET {url}: {e}")))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS && attempt < RATE_LIMIT_RETRIES {
                if let Some(delay) = retry_after_secs(&response) {
                    attempt += 1;
                    warn!(url, attempt, delay, "rate limited, backing off");
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                    continue;
                }
            }

            if !status.is_success() {
                return Err(ApiError::Transport(format!("GET {url}: status {status}")));
            }

            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Transport(format!("GET {url}: {e}")))?;
            if body.trim().is_empty() {
                return Err(ApiError::EmptyResponse {
                    url: url.to_string(),
                });
            }

            debug!(url, bytes = body.len(), "fetch ok");
            return Ok(body);
        }
    }
}

/// Parse the `Retry-After` header as whole seconds.
fn retry_after_secs(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
