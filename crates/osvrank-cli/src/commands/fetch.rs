// SPDX-License-Identifier: Apache-2.0

//! `osvrank fetch` - download and unpack the OSV bulk snapshot.

use std::path::Path;

use anyhow::Result;
use osvrank_core::{pipeline, AppConfig};
use tracing::debug;

/// Download the snapshot archive and unpack it into `dir`.
///
/// Returns the number of advisory files extracted.
pub async fn run(config: &AppConfig, dir: &Path) -> Result<usize> {
    debug!(url = %config.snapshot.url, dir = %dir.display(), "Fetching snapshot");
    let files = pipeline::run_fetch(config, dir).await?;
    Ok(files)
}
