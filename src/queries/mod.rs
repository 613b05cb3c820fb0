//! Query modules for the crypto dashboard SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection), fetches through its cache
//! manager, and returns typed models.

pub mod global;
pub mod history;
pub mod sentiment;
pub mod weekly;

pub use global::GlobalQuery;
pub use history::HistoryQuery;
pub use sentiment::SentimentQuery;
pub use weekly::WeeklyQuery;

use crate::error::{CryptodashError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Extract the `"data"` field from a JSON wrapper, or return the value as-is
/// if there is no wrapper.
pub(crate) fn extract_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Convert `[[epoch_ms, value], ...]` pairs into timestamped values.
///
/// Timestamps arrive as JSON numbers that may carry a fractional part.
pub(crate) fn series_points(pairs: &[[f64; 2]]) -> Result<Vec<(DateTime<Utc>, f64)>> {
    pairs
        .iter()
        .map(|[ms, value]| {
            let ts = DateTime::from_timestamp_millis(*ms as i64).ok_or_else(|| {
                CryptodashError::InvalidArgument(format!("Timestamp {} ms is out of range", ms))
            })?;
            Ok((ts, *value))
        })
        .collect()
}
