// SPDX-License-Identifier: Apache-2.0

//! TTL-based file caching for npm download counts.
//!
//! Registry lookups dominate the runtime of a `rank` invocation, so fetched
//! counts are kept on disk as JSON with an embedded timestamp and re-used
//! across runs while within their TTL.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A cached entry with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached data.
    pub data: T,
    /// When the entry was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Create a new cache entry stamped with the current time.
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Check if this entry is still valid based on TTL.
    pub fn is_valid(&self, ttl: Duration) -> bool {
        let now = Utc::now();
        now.signed_duration_since(self.cached_at) < ttl
    }
}

/// Returns the cache directory.
///
/// - Linux: `~/.cache/osvrank`
/// - macOS: `~/Library/Caches/osvrank`
/// - Windows: `C:\Users\<User>\AppData\Local\osvrank`
#[must_use]
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .expect("Failed to determine cache directory")
        .join("osvrank")
}

/// Generate a cache key for a package's download count.
///
/// Scoped package names contain `/`, which would nest directories, so the
/// separator is flattened to `_`.
#[must_use]
pub fn cache_key_downloads(package: &str) -> String {
    format!("downloads/{}.json", package.replace('/', "_"))
}

/// Load a cached entry by key.
///
/// Returns `None` when no entry exists on disk yet; the caller falls
/// through to a live lookup.
///
/// # Errors
///
/// Returns an error if an existing entry cannot be read or decoded.
pub fn read_cache<T: for<'de> Deserialize<'de>>(key: &str) -> Result<Option<CacheEntry<T>>> {
    let path = cache_dir().join(key);
    if !path.exists() {
        return Ok(None);
    }

    let bytes =
        fs::read(&path).with_context(|| format!("Failed to read cache entry: {}", path.display()))?;
    let entry = serde_json::from_slice(&bytes)
        .with_context(|| format!("Corrupt cache entry: {}", path.display()))?;
    Ok(Some(entry))
}

/// Store a cache entry under `key`, creating parent directories as needed.
///
/// The entry is staged to a sibling temp file and renamed into place, so an
/// interrupted run never leaves a half-written entry for the next run to
/// choke on.
///
/// # Errors
///
/// Returns an error if the entry cannot be encoded or written.
pub fn write_cache<T: Serialize>(key: &str, entry: &CacheEntry<T>) -> Result<()> {
    let path = cache_dir().join(key);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
    }

    let json = serde_json::to_vec(entry).context("Failed to encode cache entry")?;
    let staged = path.with_extension("tmp");
    fs::write(&staged, json)
        .with_context(|| format!("Failed to stage cache entry: {}", staged.display()))?;
    fs::rename(&staged, &path)
        .with_context(|| format!("Failed to commit cache entry: {}", path.display()))?;

    Ok(())
}
