// SPDX-License-Identifier: Apache-2.0

//! osvrank - priority ranking of OSV advisories for the npm ecosystem.
//!
//! A CLI tool that downloads the OSV bulk snapshot, extracts recent GHSA
//! and MAL advisories, and ranks them by a weighted priority score.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use osvrank_core::load_config;
use tracing::debug;

use crate::cli::{Cli, OutputContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let output_ctx = OutputContext::from_cli(cli.output, cli.quiet);

    let config = load_config().context("Failed to load configuration")?;
    debug!("Configuration loaded successfully");

    match commands::run(cli.command, output_ctx, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let formatted = errors::format_error(&e);
            eprintln!("Error: {formatted}");
            Err(e)
        }
    }
}
