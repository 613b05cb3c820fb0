//! Async wrapper around [`CryptodashSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client and DuckDB do their work.
//!
//! # Example
//!
//! ```no_run
//! use cryptodash_sdk::models::DominanceFilter;
//! use cryptodash_sdk::AsyncCryptodashSdk;
//!
//! # async fn example() -> cryptodash_sdk::Result<()> {
//! let sdk = AsyncCryptodashSdk::builder().build().await?;
//!
//! let report = sdk.weekly_differential("bitcoin").await?;
//!
//! // Run any sync SDK method via closure
//! let pie = sdk
//!     .run(|s| s.global().dominance(DominanceFilter::BtcVsAltcoins))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config;
use crate::error::{CryptodashError, Result};
use crate::models::{DifferentialReport, FearGreedReading, GlobalMarket};
use crate::CryptodashSdk;

// ---------------------------------------------------------------------------
// AsyncCryptodashSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCryptodashSdk`] instance.
pub struct AsyncCryptodashSdkBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    ttl: Duration,
}

impl Default for AsyncCryptodashSdkBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            ttl: config::DEFAULT_TTL,
        }
    }
}

impl AsyncCryptodashSdkBuilder {
    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long fetched documents stay fresh.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Build the async SDK on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncCryptodashSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = CryptodashSdk::builder()
                .offline(self.offline)
                .timeout(self.timeout)
                .ttl(self.ttl);
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            let sdk = builder.build()?;
            Ok(AsyncCryptodashSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| CryptodashError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncCryptodashSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`CryptodashSdk`].
///
/// The underlying SDK uses `RefCell` internally, so it sits behind a
/// [`Mutex`] and every call is dispatched to the blocking pool.
pub struct AsyncCryptodashSdk {
    inner: Arc<Mutex<CryptodashSdk>>,
}

impl AsyncCryptodashSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncCryptodashSdkBuilder {
        AsyncCryptodashSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CryptodashSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| CryptodashError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| CryptodashError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Global market statistics.
    pub async fn global_stats(&self) -> Result<GlobalMarket> {
        self.run(|s| s.global().stats()).await
    }

    /// Weekday return differentials for a coin over the last year.
    pub async fn weekly_differential(&self, coin_id: &str) -> Result<DifferentialReport> {
        let coin_id = coin_id.to_string();
        self.run(move |s| s.weekly().differential(&coin_id)).await
    }

    /// The last `limit` Fear & Greed readings.
    pub async fn fear_greed(&self, limit: u32) -> Result<Vec<FearGreedReading>> {
        self.run(move |s| s.sentiment().fear_greed(limit)).await
    }

    /// Drop expired cache files and loaded tables.
    pub async fn refresh(&self) -> Result<usize> {
        self.run(|s| s.refresh()).await
    }

    /// Close the SDK, releasing the HTTP client.
    pub async fn close(self) -> Result<()> {
        self.run(|s| {
            s.connection().cache.borrow_mut().close();
            Ok(())
        })
        .await
    }
}
