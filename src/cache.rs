//! Blocking HTTP client with an on-disk response cache.
//!
//! Successful JSON responses that the caller's decoder accepts are written
//! under the cache directory, keyed by a caller-supplied relative path, and
//! never expire. Cache misses go to the network through
//! [`retry::with_retry`](crate::retry::with_retry).

use crate::config;
use crate::error::{FetchFailure, Result};
use crate::retry::{self, RetryPolicy};
use reqwest::blocking::Client;
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Issues GET requests and caches their JSON bodies on disk.
pub struct CachedClient {
    /// Directory where cached responses are stored.
    pub cache_dir: PathBuf,
    /// If true, never touch the network (serve cached responses only).
    pub offline: bool,
    timeout: Duration,
    retry: RetryPolicy,
    client: RefCell<Option<Client>>,
}

impl CachedClient {
    /// Create a new client.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(
        cache_dir: Option<PathBuf>,
        offline: bool,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            timeout,
            retry,
            client: RefCell::new(None),
        })
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self) -> std::result::Result<Client, reqwest::Error> {
        let mut slot = self.client.borrow_mut();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Local path of the cache entry for `key`.
    pub fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(key)
    }

    /// GET `url` with `params`, parse the body as JSON and run it through `decode`,
    /// using the cache entry `key`.
    ///
    /// Only bodies that `decode` accepts are written to the cache. A cached body
    /// that `decode` rejects is removed and fetched again; offline, the decode
    /// error is returned instead. Status codes >= 400 are reported as
    /// [`FetchFailure::Rejected`] and never cached.
    pub fn get_json<T, F>(
        &self,
        key: &str,
        url: &str,
        params: &[(&str, String)],
        decode: F,
    ) -> std::result::Result<T, FetchFailure>
    where
        F: Fn(&serde_json::Value) -> std::result::Result<T, FetchFailure>,
    {
        let path = self.cache_path(key);

        if let Some(value) = self.read_cached(&path) {
            match decode(&value) {
                Ok(decoded) => {
                    log::debug!("Cache hit: {}", path.display());
                    return Ok(decoded);
                }
                Err(e) => {
                    log::warn!("Unusable cache file {}: {} -- removing", path.display(), e);
                    let _ = fs::remove_file(&path);
                    if self.offline {
                        return Err(e);
                    }
                }
            }
        }
        if self.offline {
            return Err(FetchFailure::Offline(key.to_string()));
        }

        let client = self
            .client()
            .map_err(|e| FetchFailure::Transient(e.to_string()))?;
        log::info!("Downloading {} ({})", url, key);

        let response = retry::with_retry(&self.retry, || client.get(url).query(params).send())
            .map_err(|e| FetchFailure::Transient(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchFailure::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|e| FetchFailure::Transient(e.to_string()))?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| FetchFailure::Malformed(format!("response is not JSON: {}", e)))?;
        let decoded = decode(&value)?;

        if let Err(e) = write_atomic(&path, body.as_bytes()) {
            log::warn!("Failed to cache response at {}: {}", path.display(), e);
        }

        Ok(decoded)
    }

    /// Read a cached JSON body.
    ///
    /// A cache entry that fails to parse (truncated write, disk error) is
    /// removed so the next request goes back to the network.
    fn read_cached(&self, path: &Path) -> Option<serde_json::Value> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Corrupt cache file {}: {} -- removing", path.display(), e);
                let _ = fs::remove_file(path);
                None
            }
        }
    }
}

/// Write to a temp file beside `dest` and rename, so readers never see a partial file.
fn write_atomic(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
