//! Day-of-week return differentials.
//!
//! Turns a year of raw price samples into two weekly series: Monday's daily
//! return minus Sunday's, and Friday's minus Thursday's, both in percentage
//! points, plus their averages. The pipeline runs in fixed stages:
//!
//! 1. validate ordering and prices
//! 2. resample to one mean price per UTC calendar date
//! 3. day-over-day returns between adjacent dates
//! 4. pivot into a (ISO week, weekday) table, last value wins
//! 5. keep weeks with Monday, Sunday, Friday and Thursday all present
//! 6. compute per-week differentials and their means
//!
//! # Example
//!
//! ```rust
//! use cryptodash_sdk::analysis::WeeklyReturnDifferential;
//! use cryptodash_sdk::models::PriceSample;
//!
//! // Sunday 2024-01-07 followed by four full ISO weeks of flat prices
//! let start_ms = 1_704_585_600_000_i64;
//! let samples: Vec<PriceSample> = (0..29)
//!     .map(|d| PriceSample::new(start_ms + d * 86_400_000, 100.0))
//!     .collect();
//!
//! let report = WeeklyReturnDifferential::default().compute(&samples).unwrap();
//! assert_eq!(report.weeks_retained, 4);
//! assert_eq!(report.monday_minus_sunday_avg, 0.0);
//! ```

use crate::config::MIN_COMPLETE_WEEKS;
use crate::error::{CryptodashError, Result};
use crate::models::{
    DailyPrice, DailyReturn, DifferentialReport, IsoWeekKey, PriceSample, WeeklyDifferential,
};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// WeeklyReturnDifferential
// ---------------------------------------------------------------------------

/// Computes weekday return differentials for a single asset.
#[derive(Debug, Clone, Copy)]
pub struct WeeklyReturnDifferential {
    min_complete_weeks: usize,
}

impl Default for WeeklyReturnDifferential {
    fn default() -> Self {
        Self {
            min_complete_weeks: MIN_COMPLETE_WEEKS,
        }
    }
}

impl WeeklyReturnDifferential {
    /// Require at least `min_complete_weeks` complete weeks (never fewer than one).
    pub fn new(min_complete_weeks: usize) -> Self {
        Self {
            min_complete_weeks: min_complete_weeks.max(1),
        }
    }

    pub fn min_complete_weeks(&self) -> usize {
        self.min_complete_weeks
    }

    /// Run the full pipeline over ascending price samples.
    ///
    /// # Errors
    ///
    /// * [`CryptodashError::NonMonotonicInput`] if timestamps are not strictly
    ///   increasing.
    /// * [`CryptodashError::InvalidArgument`] for non-finite or non-positive
    ///   prices, or timestamps outside the representable range.
    /// * [`CryptodashError::InsufficientData`] if fewer complete weeks than
    ///   required survive the weekday filter.
    pub fn compute(&self, samples: &[PriceSample]) -> Result<DifferentialReport> {
        validate_prices(samples)?;
        validate_chronological(samples)?;

        let daily = resample_daily(samples)?;
        let returns = daily_returns(&daily);
        let table = WeeklyWeekdayTable::from_returns(&returns);
        let complete = table.complete_weeks();

        if complete.len() < self.min_complete_weeks {
            return Err(CryptodashError::InsufficientData {
                complete_weeks: complete.len(),
                required: self.min_complete_weeks,
            });
        }

        let mut monday_minus_sunday = Vec::with_capacity(complete.len());
        let mut friday_minus_thursday = Vec::with_capacity(complete.len());

        for (week, days) in &complete {
            let week_start = week.start_date().ok_or_else(|| {
                CryptodashError::InvalidArgument(format!(
                    "ISO week {}-W{:02} has no Monday",
                    week.year, week.week
                ))
            })?;
            monday_minus_sunday.push(WeeklyDifferential {
                week_start,
                value_pct: (days.monday - days.sunday) * 100.0,
            });
            friday_minus_thursday.push(WeeklyDifferential {
                week_start,
                value_pct: (days.friday - days.thursday) * 100.0,
            });
        }

        let report = DifferentialReport {
            monday_minus_sunday_avg: mean(&monday_minus_sunday),
            friday_minus_thursday_avg: mean(&friday_minus_thursday),
            monday_minus_sunday,
            friday_minus_thursday,
            weeks_total: table.len(),
            weeks_retained: complete.len(),
        };

        debug!(
            samples = samples.len(),
            days = daily.len(),
            weeks_total = report.weeks_total,
            weeks_retained = report.weeks_retained,
            "computed weekly differentials"
        );

        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// Reject samples whose timestamps are not strictly increasing.
pub fn validate_chronological(samples: &[PriceSample]) -> Result<()> {
    for (i, pair) in samples.windows(2).enumerate() {
        if pair[1].timestamp_ms <= pair[0].timestamp_ms {
            return Err(CryptodashError::NonMonotonicInput {
                index: i + 1,
                previous_ms: pair[0].timestamp_ms,
                current_ms: pair[1].timestamp_ms,
            });
        }
    }
    Ok(())
}

/// Reject prices a return cannot be computed from.
pub fn validate_prices(samples: &[PriceSample]) -> Result<()> {
    for (i, s) in samples.iter().enumerate() {
        if !s.price.is_finite() || s.price <= 0.0 {
            return Err(CryptodashError::InvalidArgument(format!(
                "Sample {} has unusable price {}",
                i, s.price
            )));
        }
    }
    Ok(())
}

/// Average all samples that fall on the same UTC calendar date.
///
/// Dates without samples are absent from the output; nothing is filled in.
/// Prices within a date are summed in sorted order, so the mean does not
/// depend on the order the samples arrived in.
pub fn resample_daily(samples: &[PriceSample]) -> Result<Vec<DailyPrice>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for s in samples {
        let ts = s.timestamp().ok_or_else(|| {
            CryptodashError::InvalidArgument(format!(
                "Timestamp {} ms is out of range",
                s.timestamp_ms
            ))
        })?;
        by_date.entry(ts.date_naive()).or_default().push(s.price);
    }

    Ok(by_date
        .into_iter()
        .map(|(date, mut prices)| {
            prices.sort_by(f64::total_cmp);
            let price = prices.iter().sum::<f64>() / prices.len() as f64;
            DailyPrice { date, price }
        })
        .collect())
}

/// Fractional change between each daily price and the row before it.
///
/// The previous row is used even across missing dates. The first row has no
/// predecessor and produces no return.
pub fn daily_returns(daily: &[DailyPrice]) -> Vec<DailyReturn> {
    daily
        .windows(2)
        .map(|pair| {
            let date = pair[1].date;
            DailyReturn {
                date,
                weekday: date.weekday(),
                iso_week: IsoWeekKey::of(date),
                return_pct: pair[1].price / pair[0].price - 1.0,
            }
        })
        .collect()
}

fn mean(series: &[WeeklyDifferential]) -> f64 {
    series.iter().map(|d| d.value_pct).sum::<f64>() / series.len() as f64
}

// ---------------------------------------------------------------------------
// WeeklyWeekdayTable
// ---------------------------------------------------------------------------

/// Returns for the four weekdays the differentials are built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequiredWeekdays {
    pub monday: f64,
    pub thursday: f64,
    pub friday: f64,
    pub sunday: f64,
}

/// Daily returns pivoted by ISO week (rows) and weekday (columns).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyWeekdayTable {
    rows: BTreeMap<IsoWeekKey, [Option<f64>; 7]>,
}

impl WeeklyWeekdayTable {
    /// Build the table. When a week holds several returns for the same
    /// weekday, the one appearing last in `returns` is kept.
    pub fn from_returns(returns: &[DailyReturn]) -> Self {
        let mut rows: BTreeMap<IsoWeekKey, [Option<f64>; 7]> = BTreeMap::new();
        for r in returns {
            let row = rows.entry(r.iso_week).or_insert([None; 7]);
            row[r.weekday.num_days_from_monday() as usize] = Some(r.return_pct);
        }
        Self { rows }
    }

    /// Number of ISO weeks with at least one return.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The return recorded for a weekday in a week, if any.
    pub fn get(&self, week: IsoWeekKey, weekday: Weekday) -> Option<f64> {
        self.rows
            .get(&week)
            .and_then(|row| row[weekday.num_days_from_monday() as usize])
    }

    /// Iterate weeks in chronological order.
    pub fn weeks(&self) -> impl Iterator<Item = IsoWeekKey> + '_ {
        self.rows.keys().copied()
    }

    /// Weeks with Monday, Thursday, Friday and Sunday all present, oldest first.
    pub fn complete_weeks(&self) -> Vec<(IsoWeekKey, RequiredWeekdays)> {
        self.rows
            .iter()
            .filter_map(|(week, row)| {
                let days = RequiredWeekdays {
                    monday: row[Weekday::Mon.num_days_from_monday() as usize]?,
                    thursday: row[Weekday::Thu.num_days_from_monday() as usize]?,
                    friday: row[Weekday::Fri.num_days_from_monday() as usize]?,
                    sunday: row[Weekday::Sun.num_days_from_monday() as usize]?,
                };
                Some((*week, days))
            })
            .collect()
    }
}
