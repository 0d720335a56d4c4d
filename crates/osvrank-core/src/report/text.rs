// SPDX-License-Identifier: Apache-2.0

//! Free-text analysis report.
//!
//! Summarizes the batch: GHSA/MAL totals, malformed tally, CWE frequency,
//! severity distribution, MAL package sample, and the ranked short-list.

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::OsvRankError;
use crate::osv::{Advisory, AdvisoryKind};
use crate::score::ScoredAdvisory;

/// How many CWE entries the report lists.
const CWE_SAMPLE: usize = 12;
/// How many MAL packages the report lists.
const MAL_SAMPLE: usize = 10;

/// Inputs to the report writer.
pub struct ReportInput<'a> {
    /// All extracted advisories (GHSA and MAL).
    pub advisories: &'a [Advisory],
    /// Count of records skipped as malformed.
    pub malformed: usize,
    /// The ranked short-list (already truncated to top-N).
    pub top: &'a [ScoredAdvisory],
    /// Recency window in months, for the header.
    pub months: u32,
}

/// Write the analysis report to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_report(path: &Path, input: &ReportInput<'_>) -> Result<(), OsvRankError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let report = render_report(input);
    fs::write(path, report)?;
    debug!(path = %path.display(), "Analysis report written");
    Ok(())
}

/// Render the report as a string.
#[must_use]
pub fn render_report(input: &ReportInput<'_>) -> String {
    let ghsa: Vec<&Advisory> = input
        .advisories
        .iter()
        .filter(|a| a.kind == AdvisoryKind::Ghsa)
        .collect();
    let mal: Vec<&Advisory> = input
        .advisories
        .iter()
        .filter(|a| a.kind == AdvisoryKind::Mal)
        .collect();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "JavaScript OSV snapshot - automated analysis (last {} months)\n",
        input.months
    );
    let _ = writeln!(out, "Total GHSA entries: {}", ghsa.len());
    let _ = writeln!(out, "Total MAL entries: {}", mal.len());
    let _ = writeln!(out, "Malformed records skipped: {}\n", input.malformed);

    let _ = writeln!(out, "Top CWEs (GHSA):");
    for (cwe, count) in top_counts(ghsa.iter().flat_map(|a| a.cwe_ids.iter()), CWE_SAMPLE) {
        let _ = writeln!(out, "  {cwe}: {count}");
    }

    let _ = writeln!(out, "\nSeverity distribution (GHSA):");
    let severity_labels = ghsa
        .iter()
        .filter_map(|a| a.severity)
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    for (label, count) in top_counts(severity_labels.iter(), severity_labels.len()) {
        let _ = writeln!(out, "  {label}: {count}");
    }

    let _ = writeln!(out, "\nTop MAL packages (sample):");
    for (package, count) in top_counts(mal.iter().map(|a| &a.package), MAL_SAMPLE) {
        let _ = writeln!(out, "  {package}: {count}");
    }

    let _ = writeln!(
        out,
        "\nRanked short-list (id, package, score, severity, downloads):"
    );
    if input.top.is_empty() {
        let _ = writeln!(out, "  (no scored advisories in this batch)");
    }
    for row in input.top {
        let severity = row
            .advisory
            .severity
            .map(|s| s.to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<22} {:<30} {:.3}  sev={:<8} downloads={}",
            row.advisory.id, row.advisory.package, row.score, severity, row.downloads
        );
    }

    out.push_str(
        "\nRecommendations:\n \
         - Treat packages scoring in the top 5 or score >= 0.80 as P0: immediate triage and hotfix.\n \
         - Focus on RCE/code injection/prototype pollution/SSRF variants first; they have the highest exploitability.\n \
         - Track MAL packages with downloads closely; block on maintainer changes or sudden publish spikes.\n \
         - Re-run this pipeline monthly against a fresh snapshot.\n",
    );

    out
}

/// Count occurrences and return the `limit` most frequent entries.
/// Ties are broken by ascending key so output is deterministic.
fn top_counts<'a, I, S>(items: I, limit: usize) -> Vec<(String, usize)>
where
    I: Iterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    let mut counter: HashMap<String, usize> = HashMap::new();
    for item in items {
        let key = item.as_ref().trim();
        if key.is_empty() {
            continue;
        }
        *counter.entry(key.to_string()).or_insert(0) += 1;
    }

    let mut entries: Vec<(String, usize)> = counter.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osv::Severity;
    use chrono::Utc;

    fn advisory(id: &str, kind: AdvisoryKind, package: &str, cwes: &[&str]) -> Advisory {
        Advisory {
            id: id.to_string(),
            kind,
            package: package.to_string(),
            ecosystem: "npm".to_string(),
            published: Utc::now(),
            summary: String::new(),
            severity: match kind {
                AdvisoryKind::Ghsa => Some(Severity::High),
                AdvisoryKind::Mal => None,
            },
            cwe_ids: cwes.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_report_counts_and_sections() {
        let advisories = vec![
            advisory("GHSA-a", AdvisoryKind::Ghsa, "foo", &["CWE-79", "CWE-1321"]),
            advisory("GHSA-b", AdvisoryKind::Ghsa, "bar", &["CWE-79"]),
            advisory("MAL-1", AdvisoryKind::Mal, "evil", &[]),
        ];
        let input = ReportInput {
            advisories: &advisories,
            malformed: 2,
            top: &[],
            months: 12,
        };

        let report = render_report(&input);
        assert!(report.contains("last 12 months"));
        assert!(report.contains("Total GHSA entries: 2"));
        assert!(report.contains("Total MAL entries: 1"));
        assert!(report.contains("Malformed records skipped: 2"));
        assert!(report.contains("CWE-79: 2"));
        assert!(report.contains("CWE-1321: 1"));
        assert!(report.contains("HIGH: 2"));
        assert!(report.contains("evil: 1"));
        assert!(report.contains("no scored advisories"));
    }

    #[test]
    fn test_report_lists_short_list_rows() {
        let advisories = vec![advisory("GHSA-a", AdvisoryKind::Ghsa, "foo", &[])];
        let top = vec![ScoredAdvisory {
            advisory: advisories[0].clone(),
            severity_norm: 7.5 / 9.0,
            weapon_flag: 1.0,
            downloads: 4200,
            downloads_norm: 1.0,
            score: 0.91,
        }];
        let input = ReportInput {
            advisories: &advisories,
            malformed: 0,
            top: &top,
            months: 12,
        };

        let report = render_report(&input);
        assert!(report.contains("GHSA-a"));
        assert!(report.contains("0.910"));
        assert!(report.contains("downloads=4200"));
        assert!(!report.contains("no scored advisories"));
    }

    #[test]
    fn test_top_counts_deterministic_ties() {
        let items = ["b", "a", "c", "a", "b"];
        let counts = top_counts(items.iter(), 3);
        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 2),
                ("b".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }
}
