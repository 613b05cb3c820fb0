//! Shared test fixtures for the crypto dashboard SDK integration tests.
//!
//! Provides `setup_offline_sdk()`, which builds an offline SDK over a temp
//! cache directory seeded with canned API responses, plus builders for daily
//! price series.

#![allow(dead_code)]

use chrono::{Duration as ChronoDuration, NaiveDate};
use cryptodash_sdk::models::PriceSample;
use cryptodash_sdk::{CacheManager, CryptodashSdk};
use serde_json::json;
use std::time::Duration;

pub const DAY_MS: i64 = 86_400_000;

/// Sunday 2024-01-07. The following Monday opens ISO week 2024-W02.
pub fn first_sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
}

/// Midnight UTC of `date`, in epoch milliseconds.
pub fn midnight_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
}

/// One sample per day at midnight UTC, starting at `start`.
pub fn daily_series(start: NaiveDate, prices: &[f64]) -> Vec<PriceSample> {
    prices
        .iter()
        .enumerate()
        .map(|(i, p)| PriceSample::new(midnight_ms(start) + i as i64 * DAY_MS, *p))
        .collect()
}

/// A leading Sunday followed by `weeks` full ISO weeks, priced by weekday.
///
/// `price_for(d)` receives the day offset from the leading Sunday, so
/// `d % 7 == 0` is a Sunday and `d % 7 == 1` a Monday.
pub fn weekday_series(weeks: usize, price_for: impl Fn(usize) -> f64) -> Vec<PriceSample> {
    let prices: Vec<f64> = (0..=weeks * 7).map(price_for).collect();
    daily_series(first_sunday(), &prices)
}

/// Monday = 110, Sunday = 100, every other day = 105.
pub fn monday_spike(d: usize) -> f64 {
    match d % 7 {
        0 => 100.0,
        1 => 110.0,
        _ => 105.0,
    }
}

/// Monday-minus-Sunday differential for the `monday_spike` pattern, in percent.
///
/// Monday's return is measured against the preceding Sunday (110 / 100),
/// Sunday's against the preceding Saturday (100 / 105).
pub fn monday_spike_differential() -> f64 {
    ((110.0 / 100.0 - 1.0) - (100.0 / 105.0 - 1.0)) * 100.0
}

pub fn date_offset(days: i64) -> NaiveDate {
    first_sunday() + ChronoDuration::days(days)
}

/// Create an offline SDK whose cache already holds every fixture response.
///
/// Returns `(CryptodashSdk, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for the duration of the test.
pub fn setup_offline_sdk() -> (CryptodashSdk, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    seed_fixtures(tmp_dir.path());
    let sdk = CryptodashSdk::builder()
        .cache_dir(tmp_dir.path())
        .offline(true)
        .build()
        .unwrap();
    (sdk, tmp_dir)
}

/// Write the canned responses into `dir` under their cache keys.
pub fn seed_fixtures(dir: &std::path::Path) {
    let cache = CacheManager::new(
        Some(dir.to_path_buf()),
        true,
        Duration::from_secs(30),
        Duration::from_secs(300),
    )
    .unwrap();

    cache.put("global", &global_fixture()).unwrap();
    cache.put("market_cap_chart_1d", &market_cap_chart_fixture()).unwrap();
    cache.put("coin_markets_100", &coin_markets_fixture()).unwrap();
    cache
        .put("market_chart_bitcoin_365d", &market_chart_fixture(6, monday_spike))
        .unwrap();
    cache
        .put("market_chart_wrapped-bitcoin_365d", &market_chart_fixture(2, monday_spike))
        .unwrap();
    cache.put("fear_greed_1", &fear_greed_fixture(1)).unwrap();
    cache.put("fear_greed_3", &fear_greed_fixture(3)).unwrap();
}

pub fn global_fixture() -> serde_json::Value {
    json!({
        "data": {
            "active_cryptocurrencies": 10000,
            "markets": 1000,
            "total_market_cap": {"usd": 2.5e12, "eur": 2.3e12},
            "total_volume": {"usd": 1.0e11, "eur": 9.2e10},
            "market_cap_percentage": {"btc": 52.0, "eth": 17.0, "usdt": 4.4},
            "market_cap_change_percentage_24h_usd": -1.25,
            "updated_at": 1704585600
        }
    })
}

/// Two hourly points, deliberately newest first.
pub fn market_cap_chart_fixture() -> serde_json::Value {
    let t0 = midnight_ms(first_sunday());
    json!({
        "market_cap_chart": {
            "market_cap": [[t0 + 3_600_000, 2.51e12], [t0, 2.49e12]],
            "volume": [[t0 + 3_600_000, 1.0e11], [t0, 9.9e10]]
        }
    })
}

pub fn coin_markets_fixture() -> serde_json::Value {
    json!([
        {"id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 68000.0,
         "market_cap": 1.3e12, "market_cap_rank": 1, "total_volume": 3.0e10,
         "price_change_percentage_24h": 1.5},
        {"id": "ethereum", "symbol": "eth", "name": "Ethereum", "current_price": 3500.0,
         "market_cap": 4.25e11, "market_cap_rank": 2, "total_volume": 1.5e10,
         "price_change_percentage_24h": -0.5},
        {"id": "tether", "symbol": "usdt", "name": "Tether", "current_price": 1.0,
         "market_cap": 1.1e11, "market_cap_rank": 3, "total_volume": 5.0e10,
         "price_change_percentage_24h": 0.01},
        {"id": "bnb", "symbol": "bnb", "name": "BNB", "current_price": 600.0,
         "market_cap": 9.0e10, "market_cap_rank": 4, "total_volume": 1.0e9,
         "price_change_percentage_24h": 0.3},
        {"id": "solana", "symbol": "sol", "name": "Solana", "current_price": 150.0,
         "market_cap": 8.0e10, "market_cap_rank": 5, "total_volume": 2.0e9,
         "price_change_percentage_24h": 2.2},
        {"id": "cardano", "symbol": "ada", "name": "Cardano", "current_price": 0.5,
         "market_cap": 2.5e10, "market_cap_rank": 6, "total_volume": 4.0e8,
         "price_change_percentage_24h": -1.0},
        {"id": "dogecoin", "symbol": "doge", "name": "Dogecoin", "current_price": 0.15,
         "market_cap": 2.0e10, "market_cap_rank": 7, "total_volume": 9.0e8,
         "price_change_percentage_24h": 4.0},
        {"id": "obscure-token", "symbol": "obs", "name": "Obscure", "current_price": null,
         "market_cap": null, "market_cap_rank": null, "total_volume": null,
         "price_change_percentage_24h": null}
    ])
}

/// A `market_chart` payload: leading Sunday plus `weeks` ISO weeks of daily prices.
pub fn market_chart_fixture(weeks: usize, price_for: fn(usize) -> f64) -> serde_json::Value {
    let samples = weekday_series(weeks, price_for);
    let prices: Vec<[f64; 2]> = samples
        .iter()
        .map(|s| [s.timestamp_ms as f64, s.price])
        .collect();
    let caps: Vec<[f64; 2]> = samples
        .iter()
        .map(|s| [s.timestamp_ms as f64, s.price * 19_000_000.0])
        .collect();
    json!({
        "prices": prices,
        "market_caps": caps,
        "total_volumes": []
    })
}

pub fn fear_greed_fixture(limit: usize) -> serde_json::Value {
    let values = ["72", "65", "40"];
    let labels = ["Greed", "Greed", "Fear"];
    let start = midnight_ms(first_sunday()) / 1000;
    let data: Vec<serde_json::Value> = (0..limit)
        .map(|i| {
            json!({
                "value": values[i],
                "value_classification": labels[i],
                "timestamp": (start - i as i64 * 86_400).to_string(),
            })
        })
        .collect();
    json!({
        "name": "Fear and Greed Index",
        "data": data,
        "metadata": {"error": null}
    })
}
