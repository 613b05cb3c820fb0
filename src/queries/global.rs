//! Whole-market queries: headline stats, market cap chart, dominance.

use std::collections::HashMap;

use serde_json::Value;

use crate::analysis::altcoin_dominance;
use crate::config::{Endpoint, TOP_FIVE_IDS};
use crate::connection::Connection;
use crate::error::{CryptodashError, Result};
use crate::models::{
    CoinMarket, DominanceFilter, DominanceSlice, GlobalData, GlobalMarket, MarketCapPoint,
};
use crate::queries::{extract_data, series_points};

/// Number of coins pulled from `/coins/markets` for the altcoin breakdown.
const ALTCOIN_UNIVERSE: u32 = 100;

// ---------------------------------------------------------------------------
// GlobalQuery
// ---------------------------------------------------------------------------

/// Query interface for global crypto market statistics.
pub struct GlobalQuery<'a> {
    conn: &'a Connection,
}

impl<'a> GlobalQuery<'a> {
    /// Create a new `GlobalQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Total market cap, 24h volume and BTC/ETH dominance.
    pub fn stats(&self) -> Result<GlobalMarket> {
        let payload = self.conn.cache.borrow_mut().fetch_json(&Endpoint::Global)?;
        let data: GlobalData = serde_json::from_value(extract_data(payload))?;

        Ok(GlobalMarket {
            total_market_cap_usd: lookup(&data.total_market_cap, "usd", "total_market_cap")?,
            total_volume_usd: lookup(&data.total_volume, "usd", "total_volume")?,
            btc_dominance: lookup(&data.market_cap_percentage, "btc", "market_cap_percentage")?,
            eth_dominance: lookup(&data.market_cap_percentage, "eth", "market_cap_percentage")?,
            active_cryptocurrencies: data.active_cryptocurrencies,
            market_cap_change_percentage_24h_usd: data.market_cap_change_percentage_24h_usd,
        })
    }

    /// Total market cap over the last `days` days, oldest first.
    pub fn market_cap_chart(&self, days: u32) -> Result<Vec<MarketCapPoint>> {
        let payload = self
            .conn
            .cache
            .borrow_mut()
            .fetch_json(&Endpoint::MarketCapChart { days })?;

        // The series is either top-level or nested under "market_cap_chart"
        let series = payload
            .get("market_cap")
            .or_else(|| payload.get("market_cap_chart").and_then(|c| c.get("market_cap")))
            .cloned()
            .ok_or_else(|| {
                CryptodashError::NotFound("market_cap series missing from chart payload".into())
            })?;
        let pairs: Vec<[f64; 2]> = serde_json::from_value(series)?;

        let mut points: Vec<MarketCapPoint> = series_points(&pairs)?
            .into_iter()
            .map(|(timestamp, market_cap)| MarketCapPoint {
                timestamp,
                market_cap,
            })
            .collect();
        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }

    /// The largest `per_page` coins by market cap, largest first.
    pub fn top_coins(&self, per_page: u32) -> Result<Vec<CoinMarket>> {
        if per_page == 0 || per_page > 250 {
            return Err(CryptodashError::InvalidArgument(format!(
                "per_page must be between 1 and 250, got {}",
                per_page
            )));
        }
        let payload = self
            .conn
            .cache
            .borrow_mut()
            .fetch_json(&Endpoint::CoinMarkets { per_page })?;
        match payload {
            Value::Array(_) => Ok(serde_json::from_value(payload)?),
            other => Err(CryptodashError::NotFound(format!(
                "Expected a coin list, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Market-share slices for the dominance pie, in percent.
    pub fn dominance(&self, filter: DominanceFilter) -> Result<Vec<DominanceSlice>> {
        let stats = self.stats()?;
        match filter {
            DominanceFilter::BtcEthOthers => Ok(vec![
                DominanceSlice::new("BTC", stats.btc_dominance),
                DominanceSlice::new("ETH", stats.eth_dominance),
                DominanceSlice::new("Others", stats.others_dominance()),
            ]),
            DominanceFilter::BtcVsAltcoins => {
                let coins = self.top_coins(ALTCOIN_UNIVERSE)?;
                let alt = altcoin_dominance(&coins, &TOP_FIVE_IDS, stats.total_market_cap_usd)?;
                Ok(vec![
                    DominanceSlice::new("BTC", stats.btc_dominance),
                    DominanceSlice::new("Altcoins (excl. Top 5)", alt),
                ])
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn lookup(map: &HashMap<String, f64>, key: &str, field: &str) -> Result<f64> {
    map.get(key)
        .copied()
        .ok_or_else(|| CryptodashError::NotFound(format!("'{}' missing from {}", key, field)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
