// SPDX-License-Identifier: Apache-2.0

//! Composite priority scoring.
//!
//! `score = w_sev * severity_norm + w_weap * weapon_flag + w_exp * downloads_norm`
//!
//! Deterministic, no history dependence: the only cross-row coupling is the
//! min-max normalization of download counts, which depends on the batch as
//! a multiset and never on row order. Weights and keywords come in through
//! [`ScoringConfig`] rather than global state so tests can override them.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::{default_keywords, ScoringSettings};
use crate::osv::{Advisory, AdvisoryKind, Severity};
use crate::score::{exposure, severity, weapon};

/// Axis weights for the composite score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    /// Weight for normalized severity.
    pub severity: f64,
    /// Weight for the weaponization flag.
    pub weaponization: f64,
    /// Weight for normalized download exposure.
    pub exposure: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            severity: 0.5,
            weaponization: 0.3,
            exposure: 0.2,
        }
    }
}

impl ScoreWeights {
    /// Weights rescaled to sum to 1, so the composite stays in [0, 1]
    /// whatever the configured magnitudes.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let total = self.severity + self.weaponization + self.exposure;
        if total <= 0.0 {
            return Self::default();
        }
        Self {
            severity: self.severity / total,
            weaponization: self.weaponization / total,
            exposure: self.exposure / total,
        }
    }
}

/// Scoring policy: weights, keyword list, and report depth.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Axis weights (normalized before use).
    pub weights: ScoreWeights,
    /// Weaponization keywords.
    pub keywords: Vec<String>,
    /// Rows retained in the ranked report.
    pub top_n: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            keywords: default_keywords(),
            top_n: 20,
        }
    }
}

impl From<&ScoringSettings> for ScoringConfig {
    fn from(settings: &ScoringSettings) -> Self {
        Self {
            weights: ScoreWeights {
                severity: settings.severity_weight,
                weaponization: settings.weaponization_weight,
                exposure: settings.exposure_weight,
            },
            keywords: settings.keywords.clone(),
            top_n: settings.top_n,
        }
    }
}

/// An advisory with its derived scoring axes. Computed once per run,
/// never mutated afterward.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredAdvisory {
    /// The underlying advisory record.
    #[serde(flatten)]
    pub advisory: Advisory,
    /// Severity normalized by the fixed maximum (9.0).
    pub severity_norm: f64,
    /// Weaponization flag (0.0 or 1.0).
    pub weapon_flag: f64,
    /// Raw last-30-day download count.
    pub downloads: u64,
    /// Download count min-max scaled across the batch.
    pub downloads_norm: f64,
    /// Composite priority score in [0, 1].
    pub score: f64,
}

/// Score the GHSA advisories of a batch and rank them.
///
/// MAL reports and GHSA records without a severity are excluded from the
/// scored set (the latter never survive extraction). The result is sorted
/// descending by score with ties broken by ascending advisory id.
#[must_use]
pub fn score_batch(
    advisories: &[Advisory],
    downloads: &HashMap<String, u64>,
    config: &ScoringConfig,
) -> Vec<ScoredAdvisory> {
    let weights = config.weights.normalized();

    let scorable: Vec<(&Advisory, Severity)> = advisories
        .iter()
        .filter(|a| a.kind == AdvisoryKind::Ghsa)
        .filter_map(|a| a.severity.map(|sev| (a, sev)))
        .collect();

    let raw_counts: Vec<f64> = scorable
        .iter()
        .map(|(a, _)| downloads.get(&a.package).copied().unwrap_or(0) as f64)
        .collect();
    let scaled_counts = exposure::min_max_scale(&raw_counts);

    let mut scored: Vec<ScoredAdvisory> = scorable
        .iter()
        .zip(scaled_counts)
        .map(|((advisory, sev), downloads_norm)| {
            let severity_norm = severity::normalize(*sev);
            let weapon_flag = weapon::weapon_flag(&advisory.summary, &config.keywords);
            let count = downloads.get(&advisory.package).copied().unwrap_or(0);

            let score = weights.severity * severity_norm
                + weights.weaponization * weapon_flag
                + weights.exposure * downloads_norm;

            ScoredAdvisory {
                advisory: (*advisory).clone(),
                severity_norm,
                weapon_flag,
                downloads: count,
                downloads_norm,
                score,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.advisory.id.cmp(&b.advisory.id))
    });

    scored
}

/// The top-N rows of an already-ranked batch.
#[must_use]
pub fn top_n(ranked: &[ScoredAdvisory], n: usize) -> &[ScoredAdvisory] {
    &ranked[..ranked.len().min(n)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osv::Severity;
    use chrono::Utc;

    fn advisory(id: &str, package: &str, severity: Severity, summary: &str) -> Advisory {
        Advisory {
            id: id.to_string(),
            kind: AdvisoryKind::Ghsa,
            package: package.to_string(),
            ecosystem: "npm".to_string(),
            published: Utc::now(),
            summary: summary.to_string(),
            severity: Some(severity),
            cwe_ids: Vec::new(),
        }
    }

    fn counts(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_documented_example_scores() {
        // A maxed-out critical advisory scores exactly 1.0; a quiet
        // low-severity one lands at 0.5 * 3.9/9.0 ~ 0.2167.
        let advisories = vec![
            advisory("GHSA-aaaa", "foo", Severity::Critical, "Prototype Pollution in foo"),
            advisory("GHSA-bbbb", "bar", Severity::Low, "minor info leak"),
        ];
        let downloads = counts(&[("foo", 1000), ("bar", 0)]);

        let ranked = score_batch(&advisories, &downloads, &ScoringConfig::default());

        assert_eq!(ranked[0].advisory.id, "GHSA-aaaa");
        assert!((ranked[0].severity_norm - 1.0).abs() < 1e-12);
        assert!((ranked[0].weapon_flag - 1.0).abs() < 1e-12);
        assert!((ranked[0].downloads_norm - 1.0).abs() < 1e-12);
        assert!((ranked[0].score - 1.0).abs() < 1e-12);

        assert_eq!(ranked[1].advisory.id, "GHSA-bbbb");
        assert!((ranked[1].severity_norm - 3.9 / 9.0).abs() < 1e-12);
        assert!((ranked[1].weapon_flag - 0.0).abs() < 1e-12);
        assert!((ranked[1].downloads_norm - 0.0).abs() < 1e-12);
        assert!((ranked[1].score - 0.5 * 3.9 / 9.0).abs() < 1e-12);
        assert!((ranked[1].score - 0.216_666).abs() < 1e-3);
    }

    #[test]
    fn test_scores_bounded() {
        let advisories = vec![
            advisory("GHSA-a", "a", Severity::Critical, "rce everywhere"),
            advisory("GHSA-b", "b", Severity::Low, "nothing"),
            advisory("GHSA-c", "c", Severity::High, "path traversal"),
        ];
        let downloads = counts(&[("a", 5000), ("b", 0), ("c", 100)]);

        for row in score_batch(&advisories, &downloads, &ScoringConfig::default()) {
            assert!((0.0..=1.0).contains(&row.score), "score: {}", row.score);
        }
    }

    #[test]
    fn test_weights_are_normalized() {
        let advisories = vec![
            advisory("GHSA-a", "a", Severity::Critical, "rce"),
            advisory("GHSA-b", "b", Severity::Low, "nothing"),
        ];
        let downloads = counts(&[("a", 100), ("b", 0)]);

        // 1/1/2 normalizes to 0.25/0.25/0.5
        let config = ScoringConfig {
            weights: ScoreWeights {
                severity: 1.0,
                weaponization: 1.0,
                exposure: 2.0,
            },
            ..ScoringConfig::default()
        };

        let ranked = score_batch(&advisories, &downloads, &config);
        assert!((ranked[0].score - (0.25 + 0.25 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_order_invariance() {
        let mut advisories = vec![
            advisory("GHSA-a", "a", Severity::High, "ssrf in client"),
            advisory("GHSA-b", "b", Severity::Moderate, "xss"),
            advisory("GHSA-c", "c", Severity::Critical, "nothing"),
        ];
        let downloads = counts(&[("a", 10), ("b", 500), ("c", 250)]);
        let config = ScoringConfig::default();

        let forward = score_batch(&advisories, &downloads, &config);
        advisories.reverse();
        let backward = score_batch(&advisories, &downloads, &config);

        let forward_ids: Vec<_> = forward.iter().map(|r| r.advisory.id.clone()).collect();
        let backward_ids: Vec<_> = backward.iter().map(|r| r.advisory.id.clone()).collect();
        assert_eq!(forward_ids, backward_ids);
        for (f, b) in forward.iter().zip(&backward) {
            assert!((f.score - b.score).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let advisories = vec![
            advisory("GHSA-zzzz", "z", Severity::High, "nothing"),
            advisory("GHSA-aaaa", "a", Severity::High, "nothing"),
        ];
        // Identical severity, no keywords, equal downloads: scores tie
        let downloads = counts(&[("z", 0), ("a", 0)]);

        let ranked = score_batch(&advisories, &downloads, &ScoringConfig::default());
        assert_eq!(ranked[0].advisory.id, "GHSA-aaaa");
        assert_eq!(ranked[1].advisory.id, "GHSA-zzzz");
    }

    #[test]
    fn test_top_n_selects_highest() {
        let advisories: Vec<Advisory> = (0..30)
            .map(|i| {
                let sev = if i < 15 { Severity::Critical } else { Severity::Low };
                advisory(&format!("GHSA-{i:04}"), &format!("pkg{i}"), sev, "nothing")
            })
            .collect();
        let downloads = HashMap::new();

        let ranked = score_batch(&advisories, &downloads, &ScoringConfig::default());
        let top = top_n(&ranked, 20);

        assert_eq!(top.len(), 20);
        // The 15 critical rows must all appear before any low row
        assert!(top[..15]
            .iter()
            .all(|r| r.advisory.severity == Some(Severity::Critical)));
        // Descending order throughout
        for pair in top.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_mal_rows_are_not_scored() {
        let mut mal = advisory("MAL-2024-1", "evil", Severity::Low, "malware");
        mal.kind = AdvisoryKind::Mal;
        mal.severity = None;
        let advisories = vec![mal, advisory("GHSA-a", "a", Severity::Low, "nothing")];

        let ranked = score_batch(&advisories, &HashMap::new(), &ScoringConfig::default());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].advisory.id, "GHSA-a");
    }

    #[test]
    fn test_empty_batch() {
        let ranked = score_batch(&[], &HashMap::new(), &ScoringConfig::default());
        assert!(ranked.is_empty());
        assert!(top_n(&ranked, 20).is_empty());
    }
}
