//! Smoke test for the crypto dashboard SDK against the live APIs.
//!
//! Hits CoinGecko and alternative.me and exercises every public query
//! interface. Public endpoints are rate limited, so failures here can be
//! transient.
//!
//! Run with:
//! ```sh
//! cargo test --test smoke_test -- --ignored --nocapture
//! ```

use cryptodash_sdk::format::{format_pct, format_usd};
use cryptodash_sdk::models::DominanceFilter;
use cryptodash_sdk::{CryptodashError, CryptodashSdk};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Print a section header to stderr.
fn section(name: &str) {
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  {}", name);
    eprintln!("{}", "=".repeat(60));
}

/// Counters for pass/fail/skip reporting.
struct Counters {
    pass: usize,
    fail: usize,
    skip: usize,
}

impl Counters {
    fn new() -> Self {
        Self {
            pass: 0,
            fail: 0,
            skip: 0,
        }
    }

    fn check(&mut self, label: &str, condition: bool, detail: &str) {
        let status = if condition { "PASS" } else { "FAIL" };
        if condition {
            self.pass += 1;
        } else {
            self.fail += 1;
        }
        if detail.is_empty() {
            eprintln!("  [{}] {}", status, label);
        } else {
            eprintln!("  [{}] {} -- {}", status, label, detail);
        }
    }

    fn skip(&mut self, label: &str, reason: &str) {
        self.skip += 1;
        eprintln!("  [SKIP] {} -- {}", label, reason);
    }
}

// ---------------------------------------------------------------------------
// Main smoke test
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn smoke_test() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let sdk = CryptodashSdk::builder()
        .cache_dir(tmp_dir.path())
        .build()
        .unwrap();
    let mut c = Counters::new();

    section("GLOBAL");
    match sdk.global().stats() {
        Ok(stats) => {
            c.check(
                "stats: market cap",
                stats.total_market_cap_usd > 0.0,
                &format_usd(stats.total_market_cap_usd),
            );
            c.check(
                "stats: dominance in range",
                stats.btc_dominance > 0.0 && stats.btc_dominance < 100.0,
                &format_pct(stats.btc_dominance),
            );
        }
        Err(e) => c.check("stats", false, &e.to_string()),
    }

    match sdk.global().market_cap_chart(1) {
        Ok(points) => c.check(
            "market_cap_chart(1)",
            !points.is_empty() && points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
            &format!("{} points", points.len()),
        ),
        Err(e) => c.check("market_cap_chart(1)", false, &e.to_string()),
    }

    for filter in [DominanceFilter::BtcEthOthers, DominanceFilter::BtcVsAltcoins] {
        match sdk.global().dominance(filter) {
            Ok(slices) => c.check(
                &format!("dominance({:?})", filter),
                slices.iter().all(|s| s.percent >= 0.0),
                &format!("{:?}", slices),
            ),
            Err(e) => c.check(&format!("dominance({:?})", filter), false, &e.to_string()),
        }
    }

    section("HISTORY");
    match sdk.history().trend("bitcoin", 365) {
        Ok(trend) => c.check(
            "trend(bitcoin)",
            trend.data_points > 300 && trend.min_price <= trend.max_price,
            &format!("{} points", trend.data_points),
        ),
        Err(e) => c.check("trend(bitcoin)", false, &e.to_string()),
    }

    match sdk.history().implied_global_market_cap(30) {
        Ok(points) => c.check("implied_global_market_cap(30)", !points.is_empty(), ""),
        Err(e) => c.check("implied_global_market_cap(30)", false, &e.to_string()),
    }

    section("WEEKLY");
    match sdk.weekly().differential("bitcoin") {
        Ok(report) => {
            c.check(
                "differential(bitcoin): weeks",
                report.weeks_retained >= 40 && report.weeks_retained <= 53,
                &format!("{} of {}", report.weeks_retained, report.weeks_total),
            );
            eprintln!(
                "    Mon-Sun avg {}  Fri-Thu avg {}",
                format_pct(report.monday_minus_sunday_avg),
                format_pct(report.friday_minus_thursday_avg)
            );
        }
        Err(CryptodashError::InsufficientData { complete_weeks, .. }) => c.skip(
            "differential(bitcoin)",
            &format!("only {} complete weeks", complete_weeks),
        ),
        Err(e) => c.check("differential(bitcoin)", false, &e.to_string()),
    }

    section("SENTIMENT");
    match sdk.sentiment().fear_greed(7) {
        Ok(readings) => c.check(
            "fear_greed(7)",
            !readings.is_empty() && readings.iter().all(|r| r.value <= 100),
            &format!("{} readings", readings.len()),
        ),
        Err(e) => c.check("fear_greed(7)", false, &e.to_string()),
    }
    let flex = sdk.sentiment().flex_meter();
    c.check("flex_meter", flex.score <= 100, &flex.label);

    section("CACHE");
    c.check("display", sdk.to_string().contains("history_bitcoin_365d"), &sdk.to_string());
    match sdk.refresh() {
        Ok(removed) => c.check("refresh", sdk.tables().is_empty(), &format!("{} removed", removed)),
        Err(e) => c.check("refresh", false, &e.to_string()),
    }

    eprintln!(
        "\nSmoke test: {} passed, {} failed, {} skipped",
        c.pass, c.fail, c.skip
    );
    assert_eq!(c.fail, 0, "{} smoke checks failed", c.fail);
}
