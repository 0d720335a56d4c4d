// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the osvrank CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging.
//! Log level can be controlled via the `RUST_LOG` environment variable.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings only
//! osvrank rank
//!
//! # Debug output for troubleshooting
//! RUST_LOG=osvrank=debug osvrank rank
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging subsystem.
///
/// The `-v` flag raises the default filter to debug for osvrank crates.
/// The `RUST_LOG` environment variable overrides everything.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let default_filter = if verbose {
        "osvrank=debug,osvrank_core=debug,reqwest=warn"
    } else {
        "osvrank=warn,osvrank_core=warn,reqwest=error"
    };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .expect("valid default filter directives");

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
