//! Pure computations over fetched market data.
//!
//! Nothing in this module performs I/O; the query interfaces fetch data and
//! hand it to these functions.

pub mod dominance;
pub mod flex;
pub mod weekly;

pub use dominance::{altcoin_dominance, implied_total_market_cap};
pub use flex::FlexMeter;
pub use weekly::{WeeklyReturnDifferential, WeeklyWeekdayTable};
