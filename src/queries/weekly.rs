//! Weekday return analysis over a coin's trailing year of prices.

use tracing::info;

use crate::analysis::WeeklyReturnDifferential;
use crate::config::HISTORY_DAYS;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::DifferentialReport;
use crate::provider::PriceHistoryProvider;
use crate::queries::HistoryQuery;

/// Query interface for the Monday/Sunday and Friday/Thursday return differentials.
pub struct WeeklyQuery<'a> {
    conn: &'a Connection,
}

impl<'a> WeeklyQuery<'a> {
    /// Create a new `WeeklyQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Differentials for `coin_id` over the last year, requiring four complete weeks.
    pub fn differential(&self, coin_id: &str) -> Result<DifferentialReport> {
        self.differential_with(coin_id, WeeklyReturnDifferential::default())
    }

    /// Differentials for `coin_id` using a custom analysis configuration.
    pub fn differential_with(
        &self,
        coin_id: &str,
        analysis: WeeklyReturnDifferential,
    ) -> Result<DifferentialReport> {
        let history = HistoryQuery::new(self.conn);
        run(&history, coin_id, analysis)
    }

    /// Differentials computed from any price-history provider.
    pub fn from_provider<P>(provider: &P, coin_id: &str) -> Result<DifferentialReport>
    where
        P: PriceHistoryProvider + ?Sized,
    {
        run(provider, coin_id, WeeklyReturnDifferential::default())
    }
}

fn run<P>(
    provider: &P,
    coin_id: &str,
    analysis: WeeklyReturnDifferential,
) -> Result<DifferentialReport>
where
    P: PriceHistoryProvider + ?Sized,
{
    let samples = provider.price_history(coin_id, HISTORY_DAYS)?;
    let report = analysis.compute(&samples)?;
    info!(
        coin = coin_id,
        weeks = report.weeks_retained,
        monday_minus_sunday_avg = report.monday_minus_sunday_avg,
        friday_minus_thursday_avg = report.friday_minus_thursday_avg,
        "weekly differential"
    );
    Ok(report)
}
