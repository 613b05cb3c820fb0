//! Price-history providers.
//!
//! The weekly analysis does not care where prices come from. Anything that
//! can return ascending `(timestamp, price)` samples for a coin implements
//! [`PriceHistoryProvider`]: the live [`HistoryQuery`](crate::queries::HistoryQuery),
//! or a [`StaticPriceHistory`] holding samples already in memory.

use crate::error::{CryptodashError, Result};
use crate::models::PriceSample;
use std::collections::HashMap;

/// Source of price samples for a coin over a trailing window of days.
pub trait PriceHistoryProvider {
    fn price_history(&self, coin_id: &str, days: u32) -> Result<Vec<PriceSample>>;
}

/// In-memory provider keyed by coin id.
///
/// Returns the stored series as-is, ignoring `days`.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceHistory {
    series: HashMap<String, Vec<PriceSample>>,
}

impl StaticPriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the series for a coin.
    pub fn with_series(mut self, coin_id: &str, samples: Vec<PriceSample>) -> Self {
        self.series.insert(coin_id.to_string(), samples);
        self
    }
}

impl PriceHistoryProvider for StaticPriceHistory {
    fn price_history(&self, coin_id: &str, _days: u32) -> Result<Vec<PriceSample>> {
        self.series
            .get(coin_id)
            .cloned()
            .ok_or_else(|| CryptodashError::NotFound(format!("No price history for '{}'", coin_id)))
    }
}
