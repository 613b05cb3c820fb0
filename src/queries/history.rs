//! Per-coin history queries backed by CoinGecko's `market_chart` endpoint.
//!
//! Fetched price series are loaded into DuckDB as `history_<coin>_<days>d`
//! tables (columns `timestamp_ms`, `price`) so aggregate and window queries
//! run in SQL.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::analysis::implied_total_market_cap;
use crate::config::Endpoint;
use crate::connection::Connection;
use crate::error::{CryptodashError, Result};
use crate::models::{MarketCapPoint, PriceSample, PriceTrend};
use crate::provider::PriceHistoryProvider;
use crate::queries::{series_points, GlobalQuery};

/// Wire shape of `/coins/{id}/market_chart`.
#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<[f64; 2]>,
    #[serde(default)]
    market_caps: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// HistoryQuery
// ---------------------------------------------------------------------------

/// Query interface for a coin's price and market cap history.
pub struct HistoryQuery<'a> {
    conn: &'a Connection,
}

impl<'a> HistoryQuery<'a> {
    /// Create a new `HistoryQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn load_chart(&self, coin_id: &str, days: u32) -> Result<MarketChart> {
        validate_coin_id(coin_id)?;
        if days == 0 {
            return Err(CryptodashError::InvalidArgument(
                "days must be at least 1".into(),
            ));
        }
        let payload = self.conn.cache.borrow_mut().fetch_json(&Endpoint::MarketChart {
            coin_id: coin_id.to_string(),
            days,
        })?;
        Ok(serde_json::from_value(payload)?)
    }

    /// USD price samples over the last `days` days, in the order the API sent them.
    ///
    /// Also (re)loads the series into the coin's DuckDB history table.
    pub fn samples(&self, coin_id: &str, days: u32) -> Result<Vec<PriceSample>> {
        let chart = self.load_chart(coin_id, days)?;
        let samples: Vec<PriceSample> = chart
            .prices
            .iter()
            .map(|[ms, price]| PriceSample::new(*ms as i64, *price))
            .collect();

        if !samples.is_empty() {
            self.conn
                .register_rows(&table_name(coin_id, days)?, &samples)?;
        }
        Ok(samples)
    }

    /// Market cap series over the last `days` days.
    pub fn market_caps(&self, coin_id: &str, days: u32) -> Result<Vec<MarketCapPoint>> {
        let chart = self.load_chart(coin_id, days)?;
        Ok(series_points(&chart.market_caps)?
            .into_iter()
            .map(|(timestamp, market_cap)| MarketCapPoint {
                timestamp,
                market_cap,
            })
            .collect())
    }

    /// Min/max/average price, time span and sample count for the window.
    pub fn trend(&self, coin_id: &str, days: u32) -> Result<PriceTrend> {
        let table = self.ensure_table(coin_id, days)?;
        let sql = format!(
            r#"
            SELECT
                MIN(price) AS min_price,
                MAX(price) AS max_price,
                AVG(price) AS avg_price,
                MIN(timestamp_ms) AS first_timestamp_ms,
                MAX(timestamp_ms) AS last_timestamp_ms,
                COUNT(*) AS data_points
            FROM {}
            "#,
            table
        );

        self.conn
            .execute_into::<PriceTrend>(&sql, &[])?
            .into_iter()
            .next()
            .ok_or_else(|| CryptodashError::NotFound(format!("No price history for '{}'", coin_id)))
    }

    /// Samples with `from <= timestamp <= to`, oldest first.
    pub fn between(
        &self,
        coin_id: &str,
        days: u32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PriceSample>> {
        if from > to {
            return Err(CryptodashError::InvalidArgument(format!(
                "Window start {} is after end {}",
                from, to
            )));
        }
        let table = self.ensure_table(coin_id, days)?;
        let sql = format!(
            r#"
            SELECT timestamp_ms, price
            FROM {}
            WHERE timestamp_ms >= CAST(? AS BIGINT)
              AND timestamp_ms <= CAST(? AS BIGINT)
            ORDER BY timestamp_ms ASC
            "#,
            table
        );
        let params = [
            from.timestamp_millis().to_string(),
            to.timestamp_millis().to_string(),
        ];
        self.conn.execute_into(&sql, &params)
    }

    /// Total market cap history implied by Bitcoin's caps and *current* dominance.
    ///
    /// See [`implied_total_market_cap`] for why this is only an approximation.
    pub fn implied_global_market_cap(&self, days: u32) -> Result<Vec<MarketCapPoint>> {
        let btc_caps = self.market_caps("bitcoin", days)?;
        let stats = GlobalQuery::new(self.conn).stats()?;
        implied_total_market_cap(&btc_caps, stats.btc_dominance)
    }

    /// Make sure the coin's history table exists, fetching it if needed.
    fn ensure_table(&self, coin_id: &str, days: u32) -> Result<String> {
        let table = table_name(coin_id, days)?;
        if !self.conn.has_table(&table) && self.samples(coin_id, days)?.is_empty() {
            return Err(CryptodashError::NotFound(format!(
                "No price history for '{}'",
                coin_id
            )));
        }
        Ok(table)
    }
}

impl PriceHistoryProvider for HistoryQuery<'_> {
    fn price_history(&self, coin_id: &str, days: u32) -> Result<Vec<PriceSample>> {
        self.samples(coin_id, days)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// DuckDB table holding a coin's price history for a given window.
pub fn table_name(coin_id: &str, days: u32) -> Result<String> {
    validate_coin_id(coin_id)?;
    Ok(format!("history_{}_{}d", coin_id.replace('-', "_"), days))
}

/// CoinGecko ids are lowercase slugs such as `bitcoin` or `wrapped-bitcoin`.
fn validate_coin_id(coin_id: &str) -> Result<()> {
    let ok = !coin_id.is_empty()
        && !coin_id.starts_with('-')
        && coin_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(CryptodashError::InvalidArgument(format!(
            "Invalid coin id: '{}'",
            coin_id
        )))
    }
}
