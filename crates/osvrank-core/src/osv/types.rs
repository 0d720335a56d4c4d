// SPDX-License-Identifier: Apache-2.0

//! Advisory data model.
//!
//! Records are immutable once parsed from the snapshot; scoring produces
//! derived [`crate::score::ScoredAdvisory`] values without mutating them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OsvRankError;

/// Ordinal severity label attached to a GHSA advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Low severity, minimal risk.
    Low,
    /// Moderate severity.
    Moderate,
    /// High severity, significant risk.
    High,
    /// Critical severity, immediate action required.
    Critical,
}

impl Severity {
    /// Parse a severity label (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `OsvRankError::UnknownSeverity` for labels outside the
    /// documented LOW/MODERATE/HIGH/CRITICAL set.
    pub fn parse(label: &str) -> Result<Self, OsvRankError> {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MODERATE" => Ok(Severity::Moderate),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(OsvRankError::UnknownSeverity {
                label: label.to_string(),
            }),
        }
    }

    /// CVSS approximation for this label (0-10 scale).
    #[must_use]
    pub fn cvss_estimate(&self) -> f64 {
        match self {
            Severity::Low => 3.9,
            Severity::Moderate => 5.5,
            Severity::High => 7.5,
            Severity::Critical => 9.0,
        }
    }

    /// Get display string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Moderate => "MODERATE",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of an advisory record in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdvisoryKind {
    /// A GitHub Security Advisory record.
    Ghsa,
    /// A registry package flagged as intentionally malicious.
    Mal,
}

impl AdvisoryKind {
    /// Classify an advisory by its OSV id prefix.
    ///
    /// Returns `None` for record families outside the scored dataset
    /// (e.g., CVE mirrors without a GHSA/MAL counterpart).
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        if id.starts_with("GHSA-") {
            Some(AdvisoryKind::Ghsa)
        } else if id.starts_with("MAL-") {
            Some(AdvisoryKind::Mal)
        } else {
            None
        }
    }

    /// Get display string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryKind::Ghsa => "GHSA",
            AdvisoryKind::Mal => "MAL",
        }
    }
}

impl std::fmt::Display for AdvisoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single normalized advisory row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    /// OSV record id (e.g., `GHSA-xxxx-...` or `MAL-2024-...`).
    pub id: String,
    /// GHSA advisory vs malicious-package report.
    pub kind: AdvisoryKind,
    /// Affected package name (first affected entry).
    pub package: String,
    /// Package ecosystem (always `npm` after filtering).
    pub ecosystem: String,
    /// Publication timestamp.
    pub published: DateTime<Utc>,
    /// Summary/description text used by the weaponization detector.
    pub summary: String,
    /// Severity label. `None` for MAL reports, which carry no severity.
    pub severity: Option<Severity>,
    /// Associated CWE identifiers.
    pub cwe_ids: Vec<String>,
}
