// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the osvrank CLI.

pub mod completion;
pub mod extract;
pub mod fetch;
pub mod rank;

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use osvrank_core::AppConfig;

use crate::cli::{Commands, OutputContext};
use crate::output;

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if ctx.is_interactive() {
        let s = ProgressBar::new_spinner();
        s.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        s.set_message(message.to_string());
        s.enable_steady_tick(Duration::from_millis(100));
        Some(s)
    } else {
        None
    }
}

/// Dispatch to the appropriate command handler.
pub async fn run(command: Commands, ctx: OutputContext, mut config: AppConfig) -> Result<()> {
    match command {
        Commands::Fetch { url, dir } => {
            if let Some(url) = url {
                config.snapshot.url = url;
            }
            let dir = dir.unwrap_or_else(osvrank_core::snapshot_dir);

            let spinner = maybe_spinner(&ctx, "Downloading OSV snapshot...");
            let files = fetch::run(&config, &dir).await?;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }

            output::render_fetch(files, &dir, &ctx);
            Ok(())
        }

        Commands::Extract {
            snapshot_dir,
            months,
            summary,
        } => {
            if let Some(months) = months {
                config.snapshot.months = months;
            }
            if let Some(summary) = summary {
                config.output.summary_file = summary;
            }
            let dir = snapshot_dir.unwrap_or_else(osvrank_core::snapshot_dir);

            let spinner = maybe_spinner(&ctx, "Extracting advisories...");
            let outcome = extract::run(&config, &dir)?;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }

            output::render_extract(&outcome, &config.output.summary_file, &ctx);
            Ok(())
        }

        Commands::Rank {
            summary,
            out_dir,
            top,
            no_downloads,
        } => {
            if let Some(summary) = summary {
                config.output.summary_file = summary;
            }
            if let Some(out_dir) = out_dir {
                config.output.dir = out_dir;
            }
            if let Some(top) = top {
                config.scoring.top_n = top;
            }

            let spinner = maybe_spinner(&ctx, "Scoring advisories...");
            let artifacts = rank::run(&config, no_downloads).await?;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }

            output::render_rank(&artifacts, &ctx);
            Ok(())
        }

        Commands::Completion { shell } => completion::run_generate(shell),
    }
}
