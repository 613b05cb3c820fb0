//! Time-to-live JSON cache backed by the local filesystem.
//!
//! Every remote resource is stored as `<cache_dir>/<key>.json`. An entry is
//! fresh until its file modification time plus the configured TTL; after that
//! the next fetch goes back to the network. Offline mode serves whatever is on
//! disk regardless of age.

use crate::config::{ApiBases, Endpoint};
use crate::error::{CryptodashError, Result};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// A cached JSON document together with the instant it stops being fresh.
#[derive(Debug, Clone)]
pub struct CachedJson {
    pub value: serde_json::Value,
    pub fresh_until: DateTime<Utc>,
}

impl CachedJson {
    pub fn is_fresh(&self) -> bool {
        Utc::now() < self.fresh_until
    }
}

/// Fetches JSON from the market APIs and memoizes it on disk.
pub struct CacheManager {
    /// Directory where cached files are stored.
    pub cache_dir: PathBuf,
    /// If true, never touch the network (use cached files only).
    pub offline: bool,
    /// How long a downloaded document is considered fresh.
    pub ttl: Duration,
    timeout: Duration,
    bases: ApiBases,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(
        cache_dir: Option<PathBuf>,
        offline: bool,
        timeout: Duration,
        ttl: Duration,
    ) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(crate::config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            ttl,
            timeout,
            bases: ApiBases::default(),
            client: None,
        })
    }

    /// Resolve endpoints against other base URLs, e.g. a mirror or proxy.
    pub fn with_api_bases(mut self, bases: ApiBases) -> Self {
        self.bases = bases;
        self
    }

    /// Lazy HTTP client, created on first use.
    fn client(&mut self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("cryptodash-sdk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        self.client = Some(client.clone());
        Ok(client)
    }

    /// Local path for a cache key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.cache_dir.join(format!("{}.json", key)))
    }

    /// Look up a cached document without touching the network.
    ///
    /// Returns `None` when nothing is cached. A file that fails to parse is
    /// removed and reported as absent so the next fetch replaces it.
    pub fn get(&self, key: &str) -> Result<Option<CachedJson>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let modified = fs::metadata(&path)?.modified()?;
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(CachedJson {
                value,
                fresh_until: DateTime::<Utc>::from(modified + self.ttl),
            })),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache file, removing");
                let _ = fs::remove_file(&path);
                Ok(None)
            }
        }
    }

    /// Whether `key` is cached and still inside its TTL.
    pub fn is_fresh(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.map(|c| c.is_fresh()).unwrap_or(false))
    }

    /// Return the JSON document for an endpoint, downloading it when the
    /// cached copy is missing or expired.
    ///
    /// A failed download falls back to an expired copy when one exists.
    pub fn fetch_json(&mut self, endpoint: &Endpoint) -> Result<serde_json::Value> {
        let key = endpoint.cache_key();
        let cached = self.get(&key)?;

        if let Some(entry) = &cached {
            if entry.is_fresh() || self.offline {
                debug!(key = %key, fresh_until = %entry.fresh_until, "cache hit");
                return Ok(entry.value.clone());
            }
        } else if self.offline {
            return Err(CryptodashError::NotFound(format!(
                "'{}' not cached and offline mode is enabled",
                key
            )));
        }

        let path = self.path_for(&key)?;
        match self.download(&endpoint.url_with(&self.bases), &path) {
            Ok(value) => Ok(value),
            Err(e) => match cached {
                Some(stale) => {
                    warn!(key = %key, error = %e, "download failed, serving stale cache");
                    Ok(stale.value)
                }
                None => Err(e),
            },
        }
    }

    /// Download a document and store it at `dest`.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// download never leaves a corrupt partial file behind.
    fn download(&mut self, url: &str, dest: &Path) -> Result<serde_json::Value> {
        info!(url = %url, "downloading");
        let client = self.client()?;
        let tmp_dest = dest.with_extension("json.tmp");

        let result = (|| -> Result<serde_json::Value> {
            let resp = client.get(url).send()?.error_for_status()?;
            let bytes = resp.bytes()?;
            let value: serde_json::Value = serde_json::from_slice(&bytes)?;
            fs::write(&tmp_dest, &bytes)?;
            fs::rename(&tmp_dest, dest)?;
            Ok(value)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    /// Store a document under `key` as if it had just been downloaded.
    pub fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let path = self.path_for(key)?;
        fs::write(path, serde_json::to_vec(value)?)?;
        Ok(())
    }

    /// Delete every cached document older than the TTL.
    ///
    /// Returns the number of files removed. Offline managers keep everything,
    /// since expired files are all they can serve.
    pub fn purge_expired(&self) -> Result<usize> {
        if self.offline {
            return Ok(0);
        }
        let now = SystemTime::now();
        let mut removed = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let modified = fs::metadata(&path)?.modified()?;
            let expired = now
                .duration_since(modified)
                .map(|age| age >= self.ttl)
                .unwrap_or(false);
            if expired {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "purged expired cache files");
        }
        Ok(removed)
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Close the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}

/// Keys become file names, so only a conservative alphabet is allowed.
fn validate_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(CryptodashError::InvalidArgument(format!(
            "Invalid cache key: '{}'",
            key
        )))
    }
}
