use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// GlobalMarket - Headline statistics for the whole crypto market
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMarket {
    pub total_market_cap_usd: f64,
    pub total_volume_usd: f64,
    /// Bitcoin share of total market cap, in percent.
    pub btc_dominance: f64,
    /// Ethereum share of total market cap, in percent.
    pub eth_dominance: f64,
    pub active_cryptocurrencies: Option<u64>,
    pub market_cap_change_percentage_24h_usd: Option<f64>,
}

impl GlobalMarket {
    /// Everything that is neither BTC nor ETH, in percent.
    pub fn others_dominance(&self) -> f64 {
        100.0 - self.btc_dominance - self.eth_dominance
    }
}

/// Wire shape of the `/global` payload's `data` object.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GlobalData {
    pub total_market_cap: HashMap<String, f64>,
    pub total_volume: HashMap<String, f64>,
    pub market_cap_percentage: HashMap<String, f64>,
    pub active_cryptocurrencies: Option<u64>,
    pub market_cap_change_percentage_24h_usd: Option<f64>,
}

// ---------------------------------------------------------------------------
// MarketCapPoint - One (timestamp, market cap) observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketCapPoint {
    pub timestamp: DateTime<Utc>,
    pub market_cap: f64,
}

// ---------------------------------------------------------------------------
// CoinMarket - One row of the `/coins/markets` listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
}

// ---------------------------------------------------------------------------
// Dominance breakdowns
// ---------------------------------------------------------------------------

/// Which pie the dominance breakdown should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DominanceFilter {
    /// BTC, ETH and everything else.
    BtcEthOthers,
    /// BTC against altcoins, leaving out the five largest coins.
    BtcVsAltcoins,
}

/// A labelled share of total market capitalization, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominanceSlice {
    pub label: String,
    pub percent: f64,
}

impl DominanceSlice {
    pub fn new(label: &str, percent: f64) -> Self {
        Self {
            label: label.to_string(),
            percent,
        }
    }
}
