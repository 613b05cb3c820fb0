//! Sentiment widgets: the Fear & Greed index and the flex meter.

use chrono::DateTime;
use serde_json::Value;
use tracing::warn;

use crate::analysis::FlexMeter;
use crate::config::Endpoint;
use crate::connection::Connection;
use crate::error::{CryptodashError, Result};
use crate::models::{FearGreedEntry, FearGreedReading, FlexReading};
use crate::queries::extract_data;

/// Query interface for market sentiment readings.
pub struct SentimentQuery<'a> {
    conn: &'a Connection,
}

impl<'a> SentimentQuery<'a> {
    /// Create a new `SentimentQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// The last `limit` daily Fear & Greed readings, newest first.
    pub fn fear_greed(&self, limit: u32) -> Result<Vec<FearGreedReading>> {
        if limit == 0 {
            return Err(CryptodashError::InvalidArgument(
                "limit must be at least 1".into(),
            ));
        }
        let payload = self
            .conn
            .cache
            .borrow_mut()
            .fetch_json(&Endpoint::FearGreed { limit })?;

        let entries: Vec<FearGreedEntry> = match extract_data(payload) {
            arr @ Value::Array(_) => serde_json::from_value(arr)?,
            _ => {
                return Err(CryptodashError::NotFound(
                    "Fear & Greed payload has no data array".into(),
                ))
            }
        };

        entries.into_iter().map(to_reading).collect()
    }

    /// Today's Fear & Greed reading.
    pub fn fear_greed_now(&self) -> Result<FearGreedReading> {
        self.fear_greed(1)?
            .into_iter()
            .next()
            .ok_or_else(|| CryptodashError::NotFound("Fear & Greed index is empty".into()))
    }

    /// Fear & Greed reading, or `None` when the index is unavailable.
    ///
    /// Widget-friendly variant: failures are logged instead of returned.
    pub fn fear_greed_or_none(&self) -> Option<FearGreedReading> {
        match self.fear_greed_now() {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!(error = %e, "fear & greed index unavailable");
                None
            }
        }
    }

    /// A fresh flex meter reading.
    pub fn flex_meter(&self) -> FlexReading {
        FlexMeter::new().reading()
    }
}

fn to_reading(entry: FearGreedEntry) -> Result<FearGreedReading> {
    let value = u8::try_from(entry.value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| {
            CryptodashError::InvalidArgument(format!(
                "Fear & Greed value {} is outside 0..=100",
                entry.value
            ))
        })?;
    let timestamp = i64::try_from(entry.timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| {
            CryptodashError::InvalidArgument(format!(
                "Fear & Greed timestamp {} is out of range",
                entry.timestamp
            ))
        })?;
    Ok(FearGreedReading {
        value,
        classification: entry.value_classification,
        timestamp,
    })
}
