// SPDX-License-Identifier: Apache-2.0

//! Snapshot extraction into normalized advisory rows.
//!
//! Walks a local snapshot directory of per-advisory OSV JSON files,
//! classifies GHSA vs MAL records, filters to the npm ecosystem and the
//! configured recency window, and tallies malformed records instead of
//! aborting the batch.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::OsvRankError;
use crate::osv::types::{Advisory, AdvisoryKind, Severity};

/// Wire format of an OSV record (the fields this tool consumes).
#[derive(Debug, Deserialize)]
struct OsvRecord {
    id: String,
    published: Option<String>,
    summary: Option<String>,
    details: Option<String>,
    #[serde(default)]
    affected: Vec<OsvAffected>,
    database_specific: Option<OsvDatabaseSpecific>,
}

#[derive(Debug, Deserialize)]
struct OsvAffected {
    package: Option<OsvPackage>,
}

#[derive(Debug, Deserialize)]
struct OsvPackage {
    ecosystem: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsvDatabaseSpecific {
    severity: Option<String>,
    #[serde(default)]
    cwe_ids: Vec<String>,
}

/// Result of one extraction pass over a snapshot directory.
#[derive(Debug, Default)]
pub struct ExtractOutcome {
    /// Advisories that passed all filters.
    pub advisories: Vec<Advisory>,
    /// Records skipped for missing or malformed fields.
    pub malformed: usize,
    /// Records outside the recency window.
    pub out_of_window: usize,
    /// Records outside the scored dataset (other id families or ecosystems).
    pub skipped: usize,
}

impl ExtractOutcome {
    /// Advisories of a given kind.
    #[must_use]
    pub fn of_kind(&self, kind: AdvisoryKind) -> Vec<&Advisory> {
        self.advisories.iter().filter(|a| a.kind == kind).collect()
    }
}

/// Extract advisories from `snapshot_dir` published within the last
/// `months` 30-day months.
///
/// # Errors
///
/// Returns an error only if the snapshot directory itself cannot be read.
/// Individual malformed records are tallied, never fatal.
pub fn extract_snapshot(snapshot_dir: &Path, months: u32) -> Result<ExtractOutcome, OsvRankError> {
    extract_snapshot_at(snapshot_dir, months, Utc::now())
}

/// Extraction with an explicit "now" for deterministic window filtering.
///
/// # Errors
///
/// Returns an error only if the snapshot directory itself cannot be read.
pub fn extract_snapshot_at(
    snapshot_dir: &Path,
    months: u32,
    now: DateTime<Utc>,
) -> Result<ExtractOutcome, OsvRankError> {
    if !snapshot_dir.is_dir() {
        return Err(OsvRankError::Snapshot {
            message: format!(
                "Snapshot directory not found: {} - run `osvrank fetch` first",
                snapshot_dir.display()
            ),
        });
    }

    let cutoff = now - Duration::days(i64::from(months) * 30);
    let mut outcome = ExtractOutcome::default();

    for dir_entry in fs::read_dir(snapshot_dir)? {
        let path = dir_entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %path.display(), %err, "Unreadable snapshot file");
                outcome.malformed += 1;
                continue;
            }
        };

        match parse_record(&contents, cutoff) {
            Ok(Some(advisory)) => outcome.advisories.push(advisory),
            Ok(None) => outcome.skipped += 1,
            Err(ParseSkip::OutOfWindow) => outcome.out_of_window += 1,
            Err(ParseSkip::Malformed(reason)) => {
                debug!(path = %path.display(), reason, "Skipping malformed record");
                outcome.malformed += 1;
            }
        }
    }

    info!(
        advisories = outcome.advisories.len(),
        malformed = outcome.malformed,
        out_of_window = outcome.out_of_window,
        skipped = outcome.skipped,
        "Snapshot extraction complete"
    );
    Ok(outcome)
}

/// Why a record was dropped during parsing.
enum ParseSkip {
    OutOfWindow,
    Malformed(String),
}

/// Parse one OSV JSON document into an [`Advisory`].
///
/// Returns `Ok(None)` for records outside the scored dataset (non-GHSA/MAL
/// id families, non-npm ecosystems).
fn parse_record(contents: &str, cutoff: DateTime<Utc>) -> Result<Option<Advisory>, ParseSkip> {
    let record: OsvRecord = serde_json::from_str(contents)
        .map_err(|e| ParseSkip::Malformed(format!("invalid JSON: {e}")))?;

    let Some(kind) = AdvisoryKind::from_id(&record.id) else {
        return Ok(None);
    };

    let published = record
        .published
        .as_deref()
        .ok_or_else(|| ParseSkip::Malformed("missing published date".to_string()))
        .and_then(|p| {
            parse_timestamp(p)
                .ok_or_else(|| ParseSkip::Malformed(format!("unparseable published date: {p}")))
        })?;

    if published < cutoff {
        return Err(ParseSkip::OutOfWindow);
    }

    let package = record
        .affected
        .first()
        .and_then(|a| a.package.as_ref())
        .ok_or_else(|| ParseSkip::Malformed("missing affected package".to_string()))?;

    let ecosystem = package.ecosystem.clone().unwrap_or_default();
    if !ecosystem.eq_ignore_ascii_case("npm") {
        return Ok(None);
    }

    let name = package
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ParseSkip::Malformed("missing package name".to_string()))?;

    let (summary, severity, cwe_ids) = match kind {
        AdvisoryKind::Ghsa => {
            let db = record
                .database_specific
                .as_ref()
                .ok_or_else(|| ParseSkip::Malformed("missing database_specific".to_string()))?;
            let label = db
                .severity
                .as_deref()
                .ok_or_else(|| ParseSkip::Malformed("missing severity".to_string()))?;
            let severity = Severity::parse(label)
                .map_err(|e| ParseSkip::Malformed(e.to_string()))?;
            (
                record.summary.clone().unwrap_or_default(),
                Some(severity),
                db.cwe_ids.clone(),
            )
        }
        // MAL reports carry no severity or CWE data; their text lives in `details`.
        AdvisoryKind::Mal => (record.details.clone().unwrap_or_default(), None, Vec::new()),
    };

    Ok(Some(Advisory {
        id: record.id,
        kind,
        package: name,
        ecosystem,
        published,
        summary,
        severity,
        cwe_ids,
    }))
}

/// Parse an OSV `published` timestamp.
///
/// OSV emits RFC 3339; some records omit the offset, so a bare
/// `%Y-%m-%dT%H:%M:%S` is accepted as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
