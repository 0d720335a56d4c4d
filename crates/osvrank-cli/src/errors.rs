// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `OsvRankError` and adds a hint for the
//! error types a user can act on. This keeps structured error data in the
//! library and presentation concerns in the CLI.

use anyhow::Error;
use osvrank_core::OsvRankError;

/// Formats an error for CLI display with helpful hints.
///
/// If the error is not an `OsvRankError`, returns the original error message.
pub fn format_error(error: &Error) -> String {
    if let Some(err) = error.downcast_ref::<OsvRankError>() {
        match err {
            OsvRankError::SummaryNotFound { .. } => {
                format!("{err}\n\nTip: Run `osvrank fetch` then `osvrank extract` to build the summary CSV.")
            }
            OsvRankError::Snapshot { .. } => {
                format!(
                    "{err}\n\nTip: Check the snapshot URL and your internet connection, then re-run `osvrank fetch`."
                )
            }
            OsvRankError::Config { .. } => {
                format!(
                    "{err}\n\nTip: Check your config file at {}",
                    osvrank_core::config_file_path().display()
                )
            }
            OsvRankError::Network(_) => {
                format!("{err}\n\nTip: Check your internet connection and try again.")
            }
            _ => err.to_string(),
        }
    } else {
        error.to_string()
    }
}
