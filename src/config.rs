use std::path::PathBuf;
use std::time::Duration;

pub const COINGECKO_BASE: &str = "https://api.coingecko.com/api/v3";
pub const FEAR_GREED_URL: &str = "https://api.alternative.me/fng/";

/// Memoization window for every endpoint, matching the dashboard refresh rate.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Coins excluded from the "BTC vs Altcoins" dominance breakdown.
pub const TOP_FIVE_IDS: [&str; 5] = ["bitcoin", "ethereum", "tether", "bnb", "solana"];

/// Trailing window fed into the weekly return analysis.
pub const HISTORY_DAYS: u32 = 365;
pub const MIN_COMPLETE_WEEKS: usize = 4;

/// Base URLs the endpoints are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBases {
    pub coingecko: String,
    pub fear_greed: String,
}

impl Default for ApiBases {
    fn default() -> Self {
        Self {
            coingecko: COINGECKO_BASE.to_string(),
            fear_greed: FEAR_GREED_URL.to_string(),
        }
    }
}

/// A remote JSON resource, addressable both by URL and by cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Global,
    MarketCapChart { days: u32 },
    CoinMarkets { per_page: u32 },
    MarketChart { coin_id: String, days: u32 },
    FearGreed { limit: u32 },
}

impl Endpoint {
    /// URL on the public APIs.
    pub fn url(&self) -> String {
        self.url_with(&ApiBases::default())
    }

    /// URL resolved against custom base URLs.
    pub fn url_with(&self, bases: &ApiBases) -> String {
        let base = bases.coingecko.trim_end_matches('/');
        match self {
            Endpoint::Global => format!("{}/global", base),
            Endpoint::MarketCapChart { days } => format!(
                "{}/global/market_cap_chart?vs_currency=usd&days={}",
                base, days
            ),
            Endpoint::CoinMarkets { per_page } => format!(
                "{}/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page=1",
                base, per_page
            ),
            Endpoint::MarketChart { coin_id, days } => format!(
                "{}/coins/{}/market_chart?vs_currency=usd&days={}",
                base, coin_id, days
            ),
            Endpoint::FearGreed { limit } => format!("{}?limit={}", bases.fear_greed, limit),
        }
    }

    /// File stem under the cache directory. One file per distinct request.
    pub fn cache_key(&self) -> String {
        match self {
            Endpoint::Global => "global".to_string(),
            Endpoint::MarketCapChart { days } => format!("market_cap_chart_{}d", days),
            Endpoint::CoinMarkets { per_page } => format!("coin_markets_{}", per_page),
            Endpoint::MarketChart { coin_id, days } => {
                format!("market_chart_{}_{}d", coin_id, days)
            }
            Endpoint::FearGreed { limit } => format!("fear_greed_{}", limit),
        }
    }
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("cryptodash-sdk")
    } else {
        PathBuf::from(".cryptodash-sdk-cache")
    }
}
