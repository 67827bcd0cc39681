//! Data accessors over the fetcher: the one-month historical maximum
//! and the latest reading.

use chrono::{Months, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Page-size cap for the historical window query.
pub const HISTORY_PAGE_SIZE: u64 = 100;

/// A single generation reading.
///
/// `end_time` is kept verbatim as the provider sent it; the dashboard
/// re-parses it, and normalizing it here could shift its meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub end_time: String,
}

impl ApiClient {
    /// Maximum reading over `[now - 1 month, now]`, capped at
    /// [`HISTORY_PAGE_SIZE`] rows.
    pub async fn historical_max(&self) -> Result<f64, ApiError> {
        let end = Utc::now();
        let start = end.checked_sub_months(Months::new(1)).unwrap_or(end);
        let url = format!(
            "{}/readings?start={}&end={}&pageSize={}&sort=asc",
            self.base_url(),
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end.to_rfc3339_opts(SecondsFormat::Secs, true),
            HISTORY_PAGE_SIZE,
        );
        let body = self.fetch(&url).await?;
        parse_historical_max(&body, HISTORY_PAGE_SIZE)
    }

    /// Most recent reading, with the raw end of its observation window.
    pub async fn latest_reading(&self) -> Result<Reading, ApiError> {
        let url = format!("{}/readings/latest", self.base_url());
        let body = self.fetch(&url).await?;
        parse_latest(&body)
    }
}

/// Scan a historical payload for the maximum `value`.
///
/// The provider sometimes declares a `pagination.total` larger than the
/// rows it actually returned; out-of-range and non-numeric entries
/// count as 0 rather than failing the scan.
pub fn parse_historical_max(body: &str, page_size: u64) -> Result<f64, ApiError> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("historical body: {e}")))?;

    let total = doc
        .pointer("/pagination/total")
        .and_then(Value::as_i64)
        .ok_or_else(|| ApiError::MalformedResponse("missing pagination.total".into()))?;
    let data = doc
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::MalformedResponse("missing data array".into()))?;

    if total <= 0 || data.first().map_or(true, Value::is_null) {
        return Err(ApiError::HistoricalDataNotFound);
    }

    let count = (total as u64).min(page_size) as usize;
    debug!(total, rows = data.len(), count, "scanning historical window");
    Ok((0..count)
        .map(|i| {
            data.get(i)
                .and_then(|row| row.get("value"))
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
        })
        .fold(0.0, f64::max))
}

/// Extract `endTime` and `value` from a latest-reading payload.
pub fn parse_latest(body: &str) -> Result<Reading, ApiError> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("latest body: {e}")))?;

    let end_time = doc
        .get("endTime")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::MalformedResponse("missing endTime".into()))?
        .to_string();
    let value = doc
        .get("value")
        .and_then(Value::as_f64)
        .ok_or_else(|| ApiError::MalformedResponse("missing value".into()))?;

    Ok(Reading { value, end_time })
}
