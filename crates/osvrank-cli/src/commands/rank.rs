// SPDX-License-Identifier: Apache-2.0

//! `osvrank rank` - score the summary CSV and emit the ranked artifacts.

use std::time::Duration;

use anyhow::Result;
use osvrank_core::{pipeline, AppConfig, DisabledDownloads, DownloadProvider, NpmDownloads};
use osvrank_core::RankArtifacts;
use tracing::debug;

/// Score the summary CSV with the configured download source.
///
/// `--no-downloads` (or `downloads.enabled = false` in config) swaps the
/// live npm client for the disabled provider, so every exposure score is 0.
pub async fn run(config: &AppConfig, no_downloads: bool) -> Result<RankArtifacts> {
    let provider: Box<dyn DownloadProvider> = if no_downloads || !config.downloads.enabled {
        debug!("Download lookups disabled");
        Box::new(DisabledDownloads)
    } else {
        Box::new(NpmDownloads::new(Duration::from_secs(
            config.downloads.timeout_seconds,
        ))?)
    };

    let artifacts = pipeline::run_rank(config, provider.as_ref()).await?;
    Ok(artifacts)
}
