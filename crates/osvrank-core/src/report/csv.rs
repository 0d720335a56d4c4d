// SPDX-License-Identifier: Apache-2.0

//! CSV artifacts: the per-advisory summary table and the ranked short-list.
//!
//! The summary CSV is the handoff between `osvrank extract` and
//! `osvrank rank`, so it is both written and read here.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::OsvRankError;
use crate::osv::extract::ExtractOutcome;
use crate::osv::{Advisory, AdvisoryKind, Severity};
use crate::score::ScoredAdvisory;

/// One row of the summary CSV.
#[derive(Debug, Serialize, Deserialize)]
struct SummaryRow {
    id: String,
    package: String,
    #[serde(rename = "type")]
    kind: String,
    cwe: String,
    severity: String,
    published: String,
    summary: String,
}

impl From<&Advisory> for SummaryRow {
    fn from(advisory: &Advisory) -> Self {
        Self {
            id: advisory.id.clone(),
            package: advisory.package.clone(),
            kind: advisory.kind.to_string(),
            cwe: advisory.cwe_ids.join(", "),
            severity: advisory
                .severity
                .map(|s| s.to_string())
                .unwrap_or_default(),
            published: advisory.published.to_rfc3339(),
            summary: advisory.summary.clone(),
        }
    }
}

/// One row of the ranked CSV.
#[derive(Debug, Serialize)]
struct RankedRow<'a> {
    id: &'a str,
    package: &'a str,
    severity: String,
    published: String,
    downloads: u64,
    severity_norm: f64,
    weapon_flag: f64,
    downloads_norm: f64,
    score: f64,
}

impl<'a> From<&'a ScoredAdvisory> for RankedRow<'a> {
    fn from(row: &'a ScoredAdvisory) -> Self {
        Self {
            id: &row.advisory.id,
            package: &row.advisory.package,
            severity: row
                .advisory
                .severity
                .map(|s| s.to_string())
                .unwrap_or_default(),
            published: row.advisory.published.to_rfc3339(),
            downloads: row.downloads,
            severity_norm: row.severity_norm,
            weapon_flag: row.weapon_flag,
            downloads_norm: row.downloads_norm,
            score: row.score,
        }
    }
}

/// Result of reading a summary CSV back into advisories.
#[derive(Debug, Default)]
pub struct SummaryReadOutcome {
    /// Rows that parsed cleanly.
    pub advisories: Vec<Advisory>,
    /// Rows skipped for missing or malformed fields.
    pub malformed: usize,
}

fn ensure_parent(path: &Path) -> Result<(), OsvRankError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write the summary CSV (one row per advisory, GHSA and MAL alike).
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_summary(path: &Path, outcome: &ExtractOutcome) -> Result<(), OsvRankError> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    if outcome.advisories.is_empty() {
        // serialize() is never called, so emit the header explicitly
        writer.write_record(["id", "package", "type", "cwe", "severity", "published", "summary"])?;
    }
    for advisory in &outcome.advisories {
        writer.serialize(SummaryRow::from(advisory))?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = outcome.advisories.len(), "Summary CSV written");
    Ok(())
}

/// Read a summary CSV back into advisory rows.
///
/// Rows with a missing id, unknown kind, unparseable date, or (for GHSA
/// rows) an unknown severity label are tallied as malformed and skipped.
///
/// # Errors
///
/// Returns `OsvRankError::SummaryNotFound` if the file is missing, or a
/// CSV error if the file itself is unreadable.
pub fn read_summary(path: &Path) -> Result<SummaryReadOutcome, OsvRankError> {
    if !path.exists() {
        return Err(OsvRankError::SummaryNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut outcome = SummaryReadOutcome::default();

    for (index, result) in reader.deserialize::<SummaryRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                warn!(row = index + 1, %err, "Skipping malformed summary row");
                outcome.malformed += 1;
                continue;
            }
        };
        match parse_row(&row) {
            Ok(advisory) => outcome.advisories.push(advisory),
            Err(reason) => {
                warn!(row = index + 1, reason, "Skipping malformed summary row");
                outcome.malformed += 1;
            }
        }
    }

    Ok(outcome)
}

fn parse_row(row: &SummaryRow) -> Result<Advisory, String> {
    if row.id.is_empty() {
        return Err("missing advisory id".to_string());
    }

    let kind = match row.kind.as_str() {
        "GHSA" => AdvisoryKind::Ghsa,
        "MAL" => AdvisoryKind::Mal,
        other => return Err(format!("unknown advisory type: {other}")),
    };

    let published = chrono::DateTime::parse_from_rfc3339(&row.published)
        .map_err(|e| format!("unparseable published date: {e}"))?
        .with_timezone(&chrono::Utc);

    let severity = match kind {
        AdvisoryKind::Ghsa => Some(Severity::parse(&row.severity).map_err(|e| e.to_string())?),
        AdvisoryKind::Mal => None,
    };

    let cwe_ids = row
        .cwe
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

    Ok(Advisory {
        id: row.id.clone(),
        kind,
        package: row.package.clone(),
        ecosystem: "npm".to_string(),
        published,
        summary: row.summary.clone(),
        severity,
        cwe_ids,
    })
}

/// Write the ranked CSV (top-N scored rows, descending).
///
/// An empty batch still produces a file with the header row, so an empty
/// or all-malformed input is a successful run with empty reports.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_ranked(path: &Path, rows: &[ScoredAdvisory]) -> Result<(), OsvRankError> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        // serialize() is never called, so emit the header explicitly
        writer.write_record([
            "id",
            "package",
            "severity",
            "published",
            "downloads",
            "severity_norm",
            "weapon_flag",
            "downloads_norm",
            "score",
        ])?;
    }
    for row in rows {
        writer.serialize(RankedRow::from(row))?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "Ranked CSV written");
    Ok(())
}
