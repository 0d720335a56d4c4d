// SPDX-License-Identifier: Apache-2.0

//! Pipeline orchestration facade.
//!
//! Thin async functions tying the ingestion, extraction, and
//! scoring/reporting stages together so every frontend (CLI today)
//! drives the same code paths.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Duration as ChronoDuration;
use tracing::info;

use crate::config::AppConfig;
use crate::error::OsvRankError;
use crate::osv::{self, AdvisoryKind, ExtractOutcome};
use crate::report::{self, ReportInput};
use crate::score::{self, DownloadProvider, ScoredAdvisory, ScoringConfig};

/// Everything `osvrank rank` produced in one run.
#[derive(Debug)]
pub struct RankArtifacts {
    /// Path of the ranked CSV.
    pub ranked_file: PathBuf,
    /// Path of the chart, `None` when the batch was empty.
    pub chart_file: Option<PathBuf>,
    /// Path of the text report.
    pub report_file: PathBuf,
    /// The ranked short-list (top-N rows, descending).
    pub top: Vec<ScoredAdvisory>,
    /// Total number of scored GHSA advisories before truncation.
    pub scored_total: usize,
    /// Total MAL reports in the batch.
    pub mal_total: usize,
    /// Malformed rows skipped while reading the summary.
    pub malformed: usize,
}

/// Download and extract the OSV snapshot archive into `dest_dir`.
///
/// # Errors
///
/// Fatal on download or extraction failure; every downstream step needs
/// the full dataset present locally.
pub async fn run_fetch(config: &AppConfig, dest_dir: &Path) -> Result<usize, OsvRankError> {
    osv::fetch_snapshot(&config.snapshot.url, dest_dir).await
}

/// Extract the local snapshot into the summary CSV.
///
/// # Errors
///
/// Returns an error if the snapshot directory is missing or the summary
/// cannot be written; malformed records are tallied, never fatal.
pub fn run_extract(
    config: &AppConfig,
    snapshot_dir: &Path,
) -> Result<ExtractOutcome, OsvRankError> {
    let outcome = osv::extract_snapshot(snapshot_dir, config.snapshot.months)?;
    report::write_summary(&config.output.summary_file, &outcome)?;
    Ok(outcome)
}

/// Score the summary CSV and emit the ranked CSV, chart, and report.
///
/// The download provider is injected so the CLI can choose between the
/// live npm client, the disabled provider, or a stub in tests.
///
/// # Errors
///
/// Returns an error if the summary is missing or an artifact cannot be
/// written. Download lookups are fail-soft and never error the run.
pub async fn run_rank(
    config: &AppConfig,
    provider: &dyn DownloadProvider,
) -> Result<RankArtifacts, OsvRankError> {
    let summary = report::read_summary(&config.output.summary_file)?;
    let scoring = ScoringConfig::from(&config.scoring);

    // Look up the most frequently affected packages first, so the lookup
    // cap spends its budget where it matters.
    let packages = packages_by_frequency(&summary.advisories);
    let downloads = score::resolve_downloads(
        &packages,
        provider,
        config.downloads.lookup_limit,
        ChronoDuration::hours(i64::try_from(config.downloads.cache_ttl_hours).unwrap_or(24)),
    )
    .await;

    let ranked = score::score_batch(&summary.advisories, &downloads, &scoring);
    let top = score::top_n(&ranked, scoring.top_n).to_vec();

    let ranked_file = config.output.ranked_file();
    report::write_ranked(&ranked_file, &top)?;

    let chart_path = config.output.chart_file();
    let chart_file = report::write_chart(&chart_path, &ranked, config.scoring.chart_top)?
        .then_some(chart_path);

    let report_file = config.output.report_file();
    report::write_report(
        &report_file,
        &ReportInput {
            advisories: &summary.advisories,
            malformed: summary.malformed,
            top: &top,
            months: config.snapshot.months,
        },
    )?;

    let mal_total = summary
        .advisories
        .iter()
        .filter(|a| a.kind == AdvisoryKind::Mal)
        .count();

    info!(
        scored = ranked.len(),
        top = top.len(),
        malformed = summary.malformed,
        "Ranking complete"
    );

    Ok(RankArtifacts {
        ranked_file,
        chart_file,
        report_file,
        top,
        scored_total: ranked.len(),
        mal_total,
        malformed: summary.malformed,
    })
}

/// Distinct scorable package names, most frequently affected first.
/// Ties are broken alphabetically so the lookup order is deterministic.
fn packages_by_frequency(advisories: &[osv::Advisory]) -> Vec<String> {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for advisory in advisories
        .iter()
        .filter(|a| a.kind == AdvisoryKind::Ghsa)
    {
        *freq.entry(advisory.package.as_str()).or_insert(0) += 1;
    }

    let mut entries: Vec<(&str, usize)> = freq.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.into_iter().map(|(pkg, _)| pkg.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osv::{Advisory, Severity};
    use crate::score::StaticDownloads;
    use chrono::{Duration, Utc};
    use std::fs;

    fn test_config(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.output.dir = dir.join("outputs");
        config.output.summary_file = dir.join("osv_summary.csv");
        config
    }

    fn ghsa(id: &str, package: &str, severity: Severity, summary: &str) -> Advisory {
        Advisory {
            id: id.to_string(),
            kind: AdvisoryKind::Ghsa,
            package: package.to_string(),
            ecosystem: "npm".to_string(),
            published: Utc::now() - Duration::days(30),
            summary: summary.to_string(),
            severity: Some(severity),
            cwe_ids: vec!["CWE-1321".to_string()],
        }
    }

    #[test]
    fn test_packages_by_frequency_ordering() {
        let advisories = vec![
            ghsa("GHSA-a", "twice", Severity::High, ""),
            ghsa("GHSA-b", "twice", Severity::Low, ""),
            ghsa("GHSA-c", "alpha", Severity::Low, ""),
            ghsa("GHSA-d", "beta", Severity::Low, ""),
        ];

        let packages = packages_by_frequency(&advisories);
        assert_eq!(packages, vec!["twice", "alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_extract_then_rank_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let snapshot = dir.path().join("snapshot");
        fs::create_dir_all(&snapshot).expect("mkdir");

        let recent = (Utc::now() - Duration::days(10)).to_rfc3339();
        fs::write(
            snapshot.join("GHSA-aaaa-bbbb-cccc.json"),
            format!(
                r#"{{
                    "id": "GHSA-aaaa-bbbb-cccc",
                    "published": "{recent}",
                    "summary": "Prototype Pollution in foo",
                    "affected": [{{"package": {{"ecosystem": "npm", "name": "foo"}}}}],
                    "database_specific": {{"severity": "CRITICAL", "cwe_ids": ["CWE-1321"]}}
                }}"#
            ),
        )
        .expect("write fixture");
        fs::write(
            snapshot.join("GHSA-dddd-eeee-ffff.json"),
            format!(
                r#"{{
                    "id": "GHSA-dddd-eeee-ffff",
                    "published": "{recent}",
                    "summary": "minor info leak",
                    "affected": [{{"package": {{"ecosystem": "npm", "name": "bar"}}}}],
                    "database_specific": {{"severity": "LOW", "cwe_ids": []}}
                }}"#
            ),
        )
        .expect("write fixture");

        let config = test_config(dir.path());

        let outcome = run_extract(&config, &snapshot).expect("extract");
        assert_eq!(outcome.advisories.len(), 2);
        assert!(config.output.summary_file.exists());

        let provider = StaticDownloads::new([("foo".to_string(), 1000), ("bar".to_string(), 0)]);
        let artifacts = run_rank(&config, &provider).await.expect("rank");

        assert_eq!(artifacts.scored_total, 2);
        assert_eq!(artifacts.top.len(), 2);
        assert_eq!(artifacts.top[0].advisory.id, "GHSA-aaaa-bbbb-cccc");
        assert!((artifacts.top[0].score - 1.0).abs() < 1e-12);
        assert!(artifacts.ranked_file.exists());
        assert!(artifacts.report_file.exists());
        assert_eq!(
            artifacts.chart_file.as_deref(),
            Some(config.output.chart_file().as_path())
        );
    }

    #[tokio::test]
    async fn test_rank_empty_summary_emits_empty_reports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let snapshot = dir.path().join("snapshot");
        fs::create_dir_all(&snapshot).expect("mkdir");

        let config = test_config(dir.path());
        run_extract(&config, &snapshot).expect("extract empty");

        let artifacts = run_rank(&config, &StaticDownloads::default())
            .await
            .expect("rank");

        assert_eq!(artifacts.scored_total, 0);
        assert!(artifacts.top.is_empty());
        assert!(artifacts.chart_file.is_none());
        assert!(artifacts.ranked_file.exists());
        assert!(artifacts.report_file.exists());
    }

    #[tokio::test]
    async fn test_rank_missing_summary_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = test_config(dir.path());

        let err = run_rank(&config, &StaticDownloads::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OsvRankError::SummaryNotFound { .. }));
    }
}
