// SPDX-License-Identifier: Apache-2.0

//! `osvrank extract` - build the summary CSV from a local snapshot.

use std::path::Path;

use anyhow::Result;
use osvrank_core::{pipeline, AppConfig, ExtractOutcome};
use tracing::debug;

/// Extract recent advisories from `snapshot_dir` into the summary CSV.
pub fn run(config: &AppConfig, snapshot_dir: &Path) -> Result<ExtractOutcome> {
    debug!(
        dir = %snapshot_dir.display(),
        months = config.snapshot.months,
        "Extracting snapshot"
    );
    let outcome = pipeline::run_extract(config, snapshot_dir)?;
    Ok(outcome)
}
