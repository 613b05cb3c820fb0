use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceSample - Raw (timestamp, price) point from a price-history provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Milliseconds since the Unix epoch, UTC.
    pub timestamp_ms: i64,
    /// Price in USD.
    pub price: f64,
}

impl PriceSample {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

// ---------------------------------------------------------------------------
// DailyPrice - Mean price per UTC calendar date
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// IsoWeekKey - ISO-8601 (year, week) pair, Monday start
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IsoWeekKey {
    pub year: i32,
    pub week: u32,
}

impl IsoWeekKey {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// The Monday that opens this week.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }
}

// ---------------------------------------------------------------------------
// DailyReturn - Day-over-day fractional change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub iso_week: IsoWeekKey,
    /// `price[i] / price[i-1] - 1`, as a fraction (0.01 is one percent).
    pub return_pct: f64,
}

// ---------------------------------------------------------------------------
// WeeklyDifferential / DifferentialReport - Output of the weekday analysis
// ---------------------------------------------------------------------------

/// One week's difference between two weekday returns, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDifferential {
    pub week_start: NaiveDate,
    pub value_pct: f64,
}

/// Per-week weekday differentials and their averages over the whole window.
///
/// Only constructed when enough complete weeks exist, so the averages are
/// always backed by data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialReport {
    pub monday_minus_sunday: Vec<WeeklyDifferential>,
    pub friday_minus_thursday: Vec<WeeklyDifferential>,
    pub monday_minus_sunday_avg: f64,
    pub friday_minus_thursday_avg: f64,
    /// ISO weeks seen in the return series, complete or not.
    pub weeks_total: usize,
    /// Weeks that had Monday, Sunday, Friday and Thursday returns.
    pub weeks_retained: usize,
}

// ---------------------------------------------------------------------------
// PriceTrend - Aggregated statistics over a price history table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTrend {
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub first_timestamp_ms: i64,
    pub last_timestamp_ms: i64,
    pub data_points: i64,
}
