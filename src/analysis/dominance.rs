//! Market-share arithmetic for the dominance widgets.

use crate::error::{CryptodashError, Result};
use crate::models::{CoinMarket, MarketCapPoint};

/// Share of `global_market_cap` held by the listed coins outside `excluded_ids`, in percent.
///
/// Coins without a reported market cap count as zero.
pub fn altcoin_dominance(
    coins: &[CoinMarket],
    excluded_ids: &[&str],
    global_market_cap: f64,
) -> Result<f64> {
    if !(global_market_cap > 0.0) {
        return Err(CryptodashError::InvalidArgument(format!(
            "Global market cap must be positive, got {}",
            global_market_cap
        )));
    }
    let altcoin_cap: f64 = coins
        .iter()
        .filter(|c| !excluded_ids.contains(&c.id.as_str()))
        .filter_map(|c| c.market_cap)
        .sum();
    Ok(altcoin_cap / global_market_cap * 100.0)
}

/// Back out a total market cap series from one coin's caps and its dominance.
///
/// This applies today's dominance to every historical point. Whenever the
/// dominance drifted over the window the result is wrong by that drift, so
/// treat it as an approximation for charting only.
pub fn implied_total_market_cap(
    coin_caps: &[MarketCapPoint],
    dominance_pct: f64,
) -> Result<Vec<MarketCapPoint>> {
    if !(dominance_pct > 0.0 && dominance_pct <= 100.0) {
        return Err(CryptodashError::InvalidArgument(format!(
            "Dominance must be in (0, 100], got {}",
            dominance_pct
        )));
    }
    let fraction = dominance_pct / 100.0;
    Ok(coin_caps
        .iter()
        .map(|p| MarketCapPoint {
            timestamp: p.timestamp,
            market_cap: p.market_cap / fraction,
        })
        .collect())
}
