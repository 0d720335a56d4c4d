// SPDX-License-Identifier: Apache-2.0

//! Download-exposure axis.
//!
//! Last-30-day npm download counts approximate how widely an affected
//! package is deployed. The lookup is a capability-injected dependency
//! ([`DownloadProvider`]) so the scorer never talks to the network
//! directly and tests can swap in a stub. Lookups are fail-soft: any
//! error yields a count of 0 and the run continues.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::{cache_key_downloads, read_cache, write_cache, CacheEntry};
use crate::error::OsvRankError;

/// Characters that must be escaped inside a package path segment.
/// Scoped names (`@scope/pkg`) keep the `@` but escape the slash.
const PACKAGE_SEGMENT: &AsciiSet = &CONTROLS.add(b'/').add(b' ').add(b'?').add(b'#');

/// Source of last-30-day download counts for a package.
#[async_trait]
pub trait DownloadProvider: Send + Sync {
    /// Fetch the last-30-day download count for `package`.
    async fn downloads_last_month(&self, package: &str) -> Result<u64, OsvRankError>;

    /// Whether results from this provider should hit the on-disk cache.
    fn uses_cache(&self) -> bool {
        true
    }
}

/// npm registry statistics endpoint response.
#[derive(Debug, Deserialize)]
struct NpmDownloadsResponse {
    #[serde(default)]
    downloads: u64,
}

/// Live provider backed by `api.npmjs.org`.
pub struct NpmDownloads {
    client: reqwest::Client,
    base_url: String,
}

impl NpmDownloads {
    /// Default npm statistics endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.npmjs.org";

    /// Create a provider with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, OsvRankError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string(), timeout)
    }

    /// Create a provider against a custom endpoint (test seam).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, OsvRankError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// URL path segment for a package name, escaping scoped-name slashes.
    #[must_use]
    pub fn package_segment(package: &str) -> String {
        utf8_percent_encode(package, PACKAGE_SEGMENT).to_string()
    }
}

#[async_trait]
impl DownloadProvider for NpmDownloads {
    async fn downloads_last_month(&self, package: &str) -> Result<u64, OsvRankError> {
        let url = format!(
            "{}/downloads/point/last-month/{}",
            self.base_url,
            Self::package_segment(package)
        );
        let response = self.client.get(&url).send().await?;
        let response = response.error_for_status()?;
        let body: NpmDownloadsResponse = response.json().await?;
        Ok(body.downloads)
    }
}

/// Provider used when download lookups are disabled: every count is 0.
pub struct DisabledDownloads;

#[async_trait]
impl DownloadProvider for DisabledDownloads {
    async fn downloads_last_month(&self, _package: &str) -> Result<u64, OsvRankError> {
        Ok(0)
    }

    fn uses_cache(&self) -> bool {
        false
    }
}

/// In-memory provider for deterministic tests.
#[derive(Default)]
pub struct StaticDownloads {
    counts: HashMap<String, u64>,
}

impl StaticDownloads {
    /// Build a stub from `(package, count)` pairs.
    #[must_use]
    pub fn new(counts: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self {
            counts: counts.into_iter().collect(),
        }
    }
}

#[async_trait]
impl DownloadProvider for StaticDownloads {
    async fn downloads_last_month(&self, package: &str) -> Result<u64, OsvRankError> {
        Ok(self.counts.get(package).copied().unwrap_or(0))
    }

    fn uses_cache(&self) -> bool {
        false
    }
}

/// Resolve download counts for a set of packages.
///
/// Looks up at most `lookup_limit` distinct packages (single attempt each,
/// no retries); everything past the cap and every failed lookup resolves
/// to 0. Successful live lookups are cached on disk with `cache_ttl`.
pub async fn resolve_downloads(
    packages: &[String],
    provider: &dyn DownloadProvider,
    lookup_limit: usize,
    cache_ttl: ChronoDuration,
) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();

    for package in packages {
        if counts.contains_key(package) {
            continue;
        }
        if counts.len() >= lookup_limit {
            counts.insert(package.clone(), 0);
            continue;
        }

        if provider.uses_cache() {
            let key = cache_key_downloads(package);
            if let Ok(Some(entry)) = read_cache::<u64>(&key) {
                if entry.is_valid(cache_ttl) {
                    debug!(package, count = entry.data, "Using cached download count");
                    counts.insert(package.clone(), entry.data);
                    continue;
                }
            }
        }

        let count = match provider.downloads_last_month(package).await {
            Ok(count) => {
                if provider.uses_cache() {
                    let key = cache_key_downloads(package);
                    if let Err(err) = write_cache(&key, &CacheEntry::new(count)) {
                        debug!(package, %err, "Failed to cache download count");
                    }
                }
                count
            }
            Err(err) => {
                warn!(package, %err, "Download lookup failed, defaulting to 0");
                0
            }
        };
        counts.insert(package.clone(), count);
    }

    counts
}

/// Min-max scale a batch of raw values into [0, 1].
///
/// A degenerate batch (all values equal, including the empty batch)
/// scales to all zeros. The result depends only on the multiset of
/// values, so row order never changes any output.
#[must_use]
pub fn min_max_scale(raw: &[f64]) -> Vec<f64> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if !min.is_finite() || !max.is_finite() || (max - min).abs() < f64::EPSILON {
        return vec![0.0; raw.len()];
    }

    raw.iter().map(|v| (v - min) / (max - min)).collect()
}
