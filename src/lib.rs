//! Crypto dashboard SDK for Rust.
//!
//! Provides a high-level client for public crypto market statistics. Data is
//! fetched from CoinGecko and alternative.me, memoized on disk with a
//! time-to-live, and price histories are loaded into an in-process DuckDB
//! database for SQL queries. On top sits the weekday return analysis:
//! Monday-vs-Sunday and Friday-vs-Thursday return differentials per ISO week.
//!
//! # Quick start
//!
//! ```no_run
//! use cryptodash_sdk::CryptodashSdk;
//! use cryptodash_sdk::models::DominanceFilter;
//!
//! let sdk = CryptodashSdk::builder().build().unwrap();
//!
//! // Headline numbers
//! let stats = sdk.global().stats().unwrap();
//! let pie = sdk.global().dominance(DominanceFilter::BtcEthOthers).unwrap();
//!
//! // Weekday return differentials for Bitcoin over the last year
//! let report = sdk.weekly().differential("bitcoin").unwrap();
//! println!("Mon - Sun: {:.2}%", report.monday_minus_sunday_avg);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod analysis;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod format;
pub mod models;
pub mod provider;
pub mod queries;

#[cfg(feature = "async")]
pub use async_client::AsyncCryptodashSdk;
pub use cache::{CacheManager, CachedJson};
pub use connection::Connection;
pub use error::{CryptodashError, Result};
pub use provider::{PriceHistoryProvider, StaticPriceHistory};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

// ---------------------------------------------------------------------------
// CryptodashSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CryptodashSdk`] instance.
///
/// Use [`CryptodashSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CryptodashSdkBuilder::build) to create the SDK.
pub struct CryptodashSdkBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    ttl: Duration,
    api_bases: config::ApiBases,
}

impl Default for CryptodashSdkBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            ttl: config::DEFAULT_TTL,
            api_bases: config::ApiBases::default(),
        }
    }
}

impl CryptodashSdkBuilder {
    /// Set a custom cache directory.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/cryptodash-sdk` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the SDK never calls the market APIs and serves cached
    /// documents regardless of age. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long fetched documents stay fresh. Defaults to 5 minutes.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Fetch from custom base URLs instead of the public APIs.
    pub fn api_bases(mut self, bases: config::ApiBases) -> Self {
        self.api_bases = bases;
        self
    }

    /// Build the SDK, initializing the cache and DuckDB connection.
    ///
    /// No network traffic happens here; documents are fetched lazily on
    /// first query.
    pub fn build(self) -> Result<CryptodashSdk> {
        let cache = CacheManager::new(self.cache_dir, self.offline, self.timeout, self.ttl)?
            .with_api_bases(self.api_bases);
        let conn = Connection::new(cache)?;
        Ok(CryptodashSdk { conn })
    }
}

// ---------------------------------------------------------------------------
// CryptodashSdk
// ---------------------------------------------------------------------------

/// The main entry point for the crypto dashboard SDK.
///
/// Wraps a [`Connection`] (which owns the [`CacheManager`] and DuckDB database)
/// and exposes domain-specific query interfaces as lightweight borrowing wrappers.
pub struct CryptodashSdk {
    conn: Connection,
}

impl CryptodashSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> CryptodashSdkBuilder {
        CryptodashSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access global market statistics and dominance breakdowns.
    pub fn global(&self) -> queries::GlobalQuery<'_> {
        queries::GlobalQuery::new(&self.conn)
    }

    /// Access per-coin price and market cap history.
    ///
    /// Histories are loaded into DuckDB tables as they are fetched.
    pub fn history(&self) -> queries::HistoryQuery<'_> {
        queries::HistoryQuery::new(&self.conn)
    }

    /// Access the Fear & Greed index and the flex meter.
    pub fn sentiment(&self) -> queries::SentimentQuery<'_> {
        queries::SentimentQuery::new(&self.conn)
    }

    /// Access the weekday return differential analysis.
    pub fn weekly(&self) -> queries::WeeklyQuery<'_> {
        queries::WeeklyQuery::new(&self.conn)
    }

    // -- Metadata and utility methods --------------------------------------

    /// Return the names of the DuckDB tables loaded so far.
    pub fn tables(&self) -> Vec<String> {
        self.conn.tables()
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Drop expired cache files and loaded tables so the next queries refetch.
    ///
    /// Returns the number of cache files removed.
    pub fn refresh(&self) -> Result<usize> {
        let removed = self.conn.cache.borrow().purge_expired()?;
        self.conn.reset_tables()?;
        info!(removed, "cache refreshed");
        Ok(removed)
    }

    /// Consume the SDK and release all resources.
    pub fn close(self) {
        self.conn.cache.borrow_mut().close();
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CryptodashSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.conn.tables();
        let cache = self.conn.cache.borrow();
        write!(
            f,
            "CryptodashSdk(cache_dir={}, tables=[{}], offline={}, ttl={}s)",
            cache.cache_dir.display(),
            tables.join(", "),
            cache.offline,
            cache.ttl.as_secs()
        )
    }
}
