// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # osvrank Core
//!
//! Core library for the osvrank CLI - heuristic priority ranking of OSV
//! vulnerability advisories for the npm ecosystem.
//!
//! This crate provides reusable components for:
//! - OSV bulk snapshot download and extraction
//! - Advisory normalization (GHSA/MAL classification, recency filtering)
//! - Priority scoring (severity, weaponization keywords, download exposure)
//! - Report emission (summary/ranked CSV, priority chart, text report)
//! - Configuration management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use osvrank_core::{load_config, pipeline, StaticDownloads};
//! use anyhow::Result;
//!
//! # async fn example() -> Result<()> {
//! let config = load_config()?;
//!
//! // Score a previously extracted summary with a stubbed download source
//! let provider = StaticDownloads::default();
//! let artifacts = pipeline::run_rank(&config, &provider).await?;
//! println!("Top advisory: {:?}", artifacts.top.first());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`osv`] - snapshot ingestion and the advisory data model
//! - [`score`] - normalizers, weaponization detection, composite scorer
//! - [`report`] - CSV/chart/report emitters
//! - [`pipeline`] - orchestration facade
//! - [`config`] - configuration loading and paths
//! - [`error`] - error types

// ============================================================================
// Error Handling
// ============================================================================

pub use error::OsvRankError;

/// Convenience Result type for osvrank operations.
///
/// This is equivalent to `std::result::Result<T, OsvRankError>`.
pub type Result<T> = std::result::Result<T, OsvRankError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    config_dir, config_file_path, data_dir, default_keywords, load_config, snapshot_dir,
    AppConfig, DownloadsConfig, OutputConfig, ScoringSettings, SnapshotConfig, UiConfig,
};

// ============================================================================
// Caching
// ============================================================================

pub use cache::CacheEntry;

// ============================================================================
// Advisory Model
// ============================================================================

pub use osv::{Advisory, AdvisoryKind, ExtractOutcome, Severity};

// ============================================================================
// Scoring
// ============================================================================

pub use score::{
    DisabledDownloads, DownloadProvider, NpmDownloads, ScoreWeights, ScoredAdvisory,
    ScoringConfig, StaticDownloads,
};

// ============================================================================
// Pipeline Facade
// ============================================================================

pub use pipeline::{run_extract, run_fetch, run_rank, RankArtifacts};

// ============================================================================
// Modules
// ============================================================================

pub mod cache;
pub mod config;
pub mod error;
pub mod osv;
pub mod pipeline;
pub mod report;
pub mod score;
