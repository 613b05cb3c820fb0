//! The "flex meter": a purely cosmetic, randomized sentiment gauge.
//!
//! It carries no market information. Show [`FlexReading::fallback`] when a
//! reading is unavailable.

use crate::models::FlexReading;
use rand::prelude::*;

/// Draws flex scores from a random number generator.
pub struct FlexMeter<R: Rng> {
    rng: R,
}

impl FlexMeter<ThreadRng> {
    /// A meter backed by the thread-local generator.
    pub fn new() -> Self {
        Self { rng: thread_rng() }
    }
}

impl Default for FlexMeter<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FlexMeter<R> {
    /// A meter backed by a caller-supplied generator, e.g. a seeded `StdRng`.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw a uniform score in `0..=100` and label it.
    pub fn reading(&mut self) -> FlexReading {
        let score: u8 = self.rng.gen_range(0..=100);
        FlexReading {
            score,
            label: label_for(score).to_string(),
        }
    }
}

impl FlexReading {
    /// The reading to display when the meter cannot produce one.
    pub fn fallback() -> Self {
        Self {
            score: 50,
            label: label_for(50).to_string(),
        }
    }
}

/// Band a score into its display label.
pub fn label_for(score: u8) -> &'static str {
    match score {
        0..=24 => "Paper Hands",
        25..=49 => "Holding",
        50..=74 => "Flexing",
        _ => "Diamond Hands",
    }
}
