//! History query tests: sample parsing, DuckDB tables and the weekly entry point.

mod common;

use chrono::{DateTime, Utc};
use common::{midnight_ms, monday_spike_differential, DAY_MS};
use cryptodash_sdk::analysis::WeeklyReturnDifferential;
use cryptodash_sdk::queries::history::table_name;
use cryptodash_sdk::{CryptodashError, PriceHistoryProvider};

// ---------------------------------------------------------------------------
// samples / market_caps
// ---------------------------------------------------------------------------

#[test]
fn samples_parse_market_chart_prices() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    let samples = sdk.history().samples("bitcoin", 365).unwrap();

    // Leading Sunday plus six weeks
    assert_eq!(samples.len(), 43);
    assert_eq!(samples[0].timestamp_ms, midnight_ms(common::first_sunday()));
    assert_eq!(samples[0].price, 100.0);
    assert_eq!(samples[1].price, 110.0);
    assert_eq!(samples[1].timestamp_ms - samples[0].timestamp_ms, DAY_MS);
}

#[test]
fn samples_register_a_history_table() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    assert!(sdk.tables().is_empty());

    sdk.history().samples("bitcoin", 365).unwrap();
    assert_eq!(sdk.tables(), vec!["history_bitcoin_365d".to_string()]);

    let rows = sdk
        .sql("SELECT COUNT(*) AS n FROM history_bitcoin_365d", &[])
        .unwrap();
    assert_eq!(rows[0]["n"], 43);
}

#[test]
fn provider_trait_delegates_to_samples() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    let history = sdk.history();
    let via_trait = history.price_history("bitcoin", 365).unwrap();
    assert_eq!(via_trait, history.samples("bitcoin", 365).unwrap());
}

#[test]
fn market_caps_follow_prices() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    let caps = sdk.history().market_caps("bitcoin", 365).unwrap();
    assert_eq!(caps.len(), 43);
    assert_eq!(caps[0].market_cap, 100.0 * 19_000_000.0);
}

#[test]
fn invalid_coin_ids_are_rejected() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    for id in ["", "Bitcoin", "bit coin", "-btc", "btc;drop"] {
        assert!(
            matches!(
                sdk.history().samples(id, 365),
                Err(CryptodashError::InvalidArgument(_))
            ),
            "coin id {:?}",
            id
        );
    }
    assert!(matches!(
        sdk.history().samples("bitcoin", 0),
        Err(CryptodashError::InvalidArgument(_))
    ));
}

#[test]
fn uncached_coin_offline_is_not_found() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    assert!(matches!(
        sdk.history().samples("ethereum", 365),
        Err(CryptodashError::NotFound(_))
    ));
}

#[test]
fn table_names_are_sql_identifiers() {
    assert_eq!(table_name("bitcoin", 365).unwrap(), "history_bitcoin_365d");
    assert_eq!(
        table_name("wrapped-bitcoin", 30).unwrap(),
        "history_wrapped_bitcoin_30d"
    );
    assert!(table_name("x'y", 1).is_err());
}

// ---------------------------------------------------------------------------
// trend / between
// ---------------------------------------------------------------------------

#[test]
fn trend_aggregates_in_sql() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    let trend = sdk.history().trend("bitcoin", 365).unwrap();

    assert_eq!(trend.data_points, 43);
    assert_eq!(trend.min_price, 100.0);
    assert_eq!(trend.max_price, 110.0);
    // 7 Sundays at 100, 6 Mondays at 110, 30 other days at 105
    let expected_avg = (7.0 * 100.0 + 6.0 * 110.0 + 30.0 * 105.0) / 43.0;
    assert!((trend.avg_price - expected_avg).abs() < 1e-9);
    assert_eq!(trend.first_timestamp_ms, midnight_ms(common::first_sunday()));
    assert_eq!(trend.last_timestamp_ms - trend.first_timestamp_ms, 42 * DAY_MS);
}

#[test]
fn between_filters_by_timestamp() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    let t0 = midnight_ms(common::first_sunday());
    let from = DateTime::<Utc>::from_timestamp_millis(t0 + DAY_MS).unwrap();
    let to = DateTime::<Utc>::from_timestamp_millis(t0 + 3 * DAY_MS).unwrap();

    let window = sdk.history().between("bitcoin", 365, from, to).unwrap();
    let stamps: Vec<i64> = window.iter().map(|s| s.timestamp_ms).collect();
    assert_eq!(stamps, vec![t0 + DAY_MS, t0 + 2 * DAY_MS, t0 + 3 * DAY_MS]);
    assert_eq!(window[0].price, 110.0);

    assert!(matches!(
        sdk.history().between("bitcoin", 365, to, from),
        Err(CryptodashError::InvalidArgument(_))
    ));
}

#[test]
fn refresh_drops_loaded_tables() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    sdk.history().trend("bitcoin", 365).unwrap();
    assert!(!sdk.tables().is_empty());

    // Offline caches keep their files
    assert_eq!(sdk.refresh().unwrap(), 0);
    assert!(sdk.tables().is_empty());
    assert!(sdk.history().trend("bitcoin", 365).is_ok());
}

// ---------------------------------------------------------------------------
// weekly entry point
// ---------------------------------------------------------------------------

#[test]
fn weekly_differential_from_cached_history() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    let report = sdk.weekly().differential("bitcoin").unwrap();

    assert_eq!(report.weeks_retained, 6);
    assert_eq!(report.monday_minus_sunday.len(), 6);
    for d in &report.monday_minus_sunday {
        assert_eq!(d.value_pct, monday_spike_differential());
    }
    assert!((report.monday_minus_sunday_avg - monday_spike_differential()).abs() < 1e-9);
    assert_eq!(report.friday_minus_thursday_avg, 0.0);
}

#[test]
fn weekly_differential_reports_insufficient_history() {
    let (sdk, _tmp) = common::setup_offline_sdk();
    let err = sdk.weekly().differential("wrapped-bitcoin").unwrap_err();
    assert!(matches!(
        err,
        CryptodashError::InsufficientData {
            complete_weeks: 2,
            required: 4
        }
    ));

    let report = sdk
        .weekly()
        .differential_with("wrapped-bitcoin", WeeklyReturnDifferential::new(2))
        .unwrap();
    assert_eq!(report.weeks_retained, 2);
}
