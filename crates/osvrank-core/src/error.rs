// SPDX-License-Identifier: Apache-2.0

//! Error types for osvrank.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during osvrank operations.
#[derive(Error, Debug)]
pub enum OsvRankError {
    /// Severity label not in the documented LOW/MODERATE/HIGH/CRITICAL set.
    #[error("Unknown severity label: {label:?}")]
    UnknownSeverity {
        /// The label as found in the advisory record.
        label: String,
    },

    /// Snapshot download or extraction failed. Fatal: every downstream step
    /// depends on the full dataset being present locally.
    #[error("Snapshot error: {message}")]
    Snapshot {
        /// Error message.
        message: String,
    },

    /// An advisory record could not be parsed into the data model.
    #[error("Malformed advisory record: {message}")]
    MalformedRecord {
        /// Error message.
        message: String,
    },

    /// The summary CSV produced by `osvrank extract` is missing.
    #[error("Summary file not found: {path} - run `osvrank extract` first")]
    SummaryNotFound {
        /// Expected location of the summary CSV.
        path: PathBuf,
    },

    /// Chart rendering error.
    #[error("Chart error: {message}")]
    Chart {
        /// Error message.
        message: String,
    },

    /// Configuration file error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Network/HTTP error from reqwest.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Zip archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for OsvRankError {
    fn from(err: config::ConfigError) -> Self {
        OsvRankError::Config {
            message: err.to_string(),
        }
    }
}
