// SPDX-License-Identifier: Apache-2.0

//! Configuration management for osvrank.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `OSVRANK_`)
//! 2. Config file: `~/.config/osvrank/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Disable download lookups via environment variable
//! OSVRANK_DOWNLOADS__ENABLED=false osvrank rank
//! ```

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::OsvRankError;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Snapshot ingestion settings.
    pub snapshot: SnapshotConfig,
    /// Priority scoring policy.
    pub scoring: ScoringSettings,
    /// npm download lookup settings.
    pub downloads: DownloadsConfig,
    /// Output artifact settings.
    pub output: OutputConfig,
    /// UI preferences.
    pub ui: UiConfig,
}

/// Snapshot ingestion settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// URL of the per-ecosystem OSV bulk archive.
    pub url: String,
    /// Recency window in months (30-day months).
    pub months: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            url: "https://osv-vulnerabilities.storage.googleapis.com/npm/all.zip".to_string(),
            months: 12,
        }
    }
}

/// Priority scoring policy.
///
/// Weights are documented defaults (0.5 severity, 0.3 weaponization,
/// 0.2 exposure) and are normalized to sum to 1 before scoring.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Weight for normalized severity.
    pub severity_weight: f64,
    /// Weight for the weaponization keyword flag.
    pub weaponization_weight: f64,
    /// Weight for normalized download exposure.
    pub exposure_weight: f64,
    /// Keywords that flip the weaponization flag (case-insensitive substrings).
    pub keywords: Vec<String>,
    /// Number of rows retained in the ranked report.
    pub top_n: usize,
    /// Number of bars in the priority chart.
    pub chart_top: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            severity_weight: 0.5,
            weaponization_weight: 0.3,
            exposure_weight: 0.2,
            keywords: default_keywords(),
            top_n: 20,
            chart_top: 10,
        }
    }
}

/// Default weaponization keyword list.
#[must_use]
pub fn default_keywords() -> Vec<String> {
    [
        "xss",
        "prototype pollution",
        "path traversal",
        "ssrf",
        "rce",
        "code injection",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// npm download lookup settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DownloadsConfig {
    /// Fetch last-30-day download counts from the npm registry.
    pub enabled: bool,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Cap on distinct packages looked up per run.
    pub lookup_limit: usize,
    /// Cached count TTL in hours.
    pub cache_ttl_hours: u64,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_seconds: 5,
            lookup_limit: 200,
            cache_ttl_hours: 24,
        }
    }
}

/// Output artifact settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for ranked CSV, chart, and report.
    pub dir: PathBuf,
    /// Summary CSV path (written by `extract`, read by `rank`).
    pub summary_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("outputs"),
            summary_file: PathBuf::from("osv_summary.csv"),
        }
    }
}

impl OutputConfig {
    /// Path of the ranked CSV artifact.
    #[must_use]
    pub fn ranked_file(&self) -> PathBuf {
        self.dir.join("ranked.csv")
    }

    /// Path of the priority chart artifact.
    #[must_use]
    pub fn chart_file(&self) -> PathBuf {
        self.dir.join("priority_score.svg")
    }

    /// Path of the free-text analysis report.
    #[must_use]
    pub fn report_file(&self) -> PathBuf {
        self.dir.join("analysis_report.txt")
    }
}

/// UI preferences.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Enable colored output.
    pub color: bool,
    /// Show progress bars.
    pub progress_bars: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress_bars: true,
        }
    }
}

/// Returns the osvrank configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/osvrank`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config.is_empty() {
            return PathBuf::from(xdg_config).join("osvrank");
        }
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".config")
        .join("osvrank")
}

/// Returns the osvrank data directory, used for snapshot storage.
///
/// Respects the `XDG_DATA_HOME` environment variable if set,
/// otherwise defaults to `~/.local/share/osvrank`.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        if !xdg_data.is_empty() {
            return PathBuf::from(xdg_data).join("osvrank");
        }
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".local")
        .join("share")
        .join("osvrank")
}

/// Returns the default local snapshot directory.
#[must_use]
pub fn snapshot_dir() -> PathBuf {
    data_dir().join("snapshot")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from config file (if exists) and environment variables.
/// Environment variables use the prefix `OSVRANK_` and double underscore
/// for nested keys (e.g., `OSVRANK_SCORING__TOP_N`).
///
/// # Errors
///
/// Returns `OsvRankError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, OsvRankError> {
    let config_path = config_file_path();

    let config = Config::builder()
        // Load from config file (optional - may not exist)
        .add_source(File::with_name(config_path.to_string_lossy().as_ref()).required(false))
        // Override with environment variables
        .add_source(
            Environment::with_prefix("OSVRANK")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults() {
        // Without any config file or env vars, should return defaults
        let config = load_config().expect("should load with defaults");

        assert_eq!(config.snapshot.months, 12);
        assert!(config.snapshot.url.ends_with("npm/all.zip"));
        assert!((config.scoring.severity_weight - 0.5).abs() < f64::EPSILON);
        assert!((config.scoring.weaponization_weight - 0.3).abs() < f64::EPSILON);
        assert!((config.scoring.exposure_weight - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.scoring.top_n, 20);
        assert_eq!(config.scoring.chart_top, 10);
        assert!(config.downloads.enabled);
        assert_eq!(config.downloads.lookup_limit, 200);
        assert!(config.ui.color);
    }

    #[test]
    fn test_default_keywords() {
        let keywords = default_keywords();
        assert_eq!(keywords.len(), 6);
        assert!(keywords.contains(&"prototype pollution".to_string()));
        assert!(keywords.contains(&"rce".to_string()));
    }

    #[test]
    fn test_config_dir_ends_with_osvrank() {
        let dir = config_dir();
        assert!(dir.ends_with("osvrank"));
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_output_paths() {
        let output = OutputConfig::default();
        assert_eq!(output.ranked_file(), PathBuf::from("outputs/ranked.csv"));
        assert_eq!(
            output.chart_file(),
            PathBuf::from("outputs/priority_score.svg")
        );
        assert_eq!(
            output.report_file(),
            PathBuf::from("outputs/analysis_report.txt")
        );
    }

    #[test]
    fn test_config_from_toml_overrides() {
        let config_str = r#"
[scoring]
severity_weight = 0.6
top_n = 5

[downloads]
enabled = false
"#;

        let config = Config::builder()
            .add_source(config::File::from_str(config_str, config::FileFormat::Toml))
            .build()
            .expect("should build config");

        let app_config: AppConfig = config.try_deserialize().expect("should deserialize");

        assert!((app_config.scoring.severity_weight - 0.6).abs() < f64::EPSILON);
        assert_eq!(app_config.scoring.top_n, 5);
        // Untouched sections keep defaults
        assert!((app_config.scoring.exposure_weight - 0.2).abs() < f64::EPSILON);
        assert!(!app_config.downloads.enabled);
        assert_eq!(app_config.snapshot.months, 12);
    }
}
