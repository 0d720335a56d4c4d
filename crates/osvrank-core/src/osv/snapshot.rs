// SPDX-License-Identifier: Apache-2.0

//! OSV bulk snapshot download and extraction.
//!
//! The OSV database publishes one zip archive per ecosystem
//! (`.../{ecosystem}/all.zip`) containing one JSON file per advisory.
//! Failures here are fatal: every downstream step depends on the full
//! dataset being present locally (no partial-pipeline continuation).

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::OsvRankError;

/// Download the snapshot archive and extract it into `dest_dir`.
///
/// Any existing contents of `dest_dir` are left in place; archive entries
/// overwrite files of the same name. Returns the number of extracted files.
///
/// # Errors
///
/// Returns `OsvRankError::Snapshot` if the download fails or returns a
/// non-success status, and `OsvRankError::Zip`/`Io` if extraction fails.
/// All of these are fatal to the run.
pub async fn fetch_snapshot(url: &str, dest_dir: &Path) -> Result<usize, OsvRankError> {
    info!(url, "Downloading OSV snapshot archive");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(600))
        .build()?;

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(OsvRankError::Snapshot {
            message: format!("Archive download failed: HTTP {} from {url}", response.status()),
        });
    }

    let bytes = response.bytes().await?;
    debug!(size = bytes.len(), "Archive downloaded");

    extract_archive(&bytes, dest_dir)
}

/// Extract a zip archive from memory into `dest_dir`.
///
/// # Errors
///
/// Returns an error if the archive is corrupt or the filesystem write fails.
pub fn extract_archive(bytes: &[u8], dest_dir: &Path) -> Result<usize, OsvRankError> {
    fs::create_dir_all(dest_dir)?;

    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut extracted = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        // enclosed_name rejects entries that would escape dest_dir
        let Some(relative) = entry.enclosed_name() else {
            debug!(name = entry.name(), "Skipping unsafe archive entry");
            continue;
        };
        let target = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = fs::File::create(&target)?;
        std::io::copy(&mut entry, &mut out)?;
        extracted += 1;
    }

    if extracted == 0 {
        return Err(OsvRankError::Snapshot {
            message: format!(
                "Archive contained no files - snapshot at {} is unusable",
                dest_dir.display()
            ),
        });
    }

    info!(extracted, dir = %dest_dir.display(), "Snapshot extracted");
    Ok(extracted)
}
