// SPDX-License-Identifier: Apache-2.0

//! Output rendering for CLI commands.
//!
//! Centralizes all output formatting logic, supporting text and JSON
//! formats. Command handlers return data; this module handles presentation.

use std::path::Path;

use comfy_table::{presets::UTF8_BORDERS_ONLY, Cell, ContentArrangement, Table};
use console::style;
use osvrank_core::{AdvisoryKind, ExtractOutcome, RankArtifacts};
use serde_json::json;

use crate::cli::{OutputContext, OutputFormat};

/// Render the result of `osvrank fetch`.
pub fn render_fetch(files: usize, dir: &Path, ctx: &OutputContext) {
    match ctx.format {
        OutputFormat::Json => {
            let output = json!({
                "files": files,
                "dir": dir.display().to_string(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).expect("Failed to serialize to JSON")
            );
        }
        OutputFormat::Text => {
            println!();
            println!(
                "{}",
                style(format!("Snapshot ready: {files} advisory files"))
                    .green()
                    .bold()
            );
            println!("  {}", style(dir.display()).cyan());
            println!();
        }
    }
}

/// Render the result of `osvrank extract`.
pub fn render_extract(outcome: &ExtractOutcome, summary_file: &Path, ctx: &OutputContext) {
    let ghsa = outcome.of_kind(AdvisoryKind::Ghsa).len();
    let mal = outcome.of_kind(AdvisoryKind::Mal).len();

    match ctx.format {
        OutputFormat::Json => {
            let output = json!({
                "total": outcome.advisories.len(),
                "ghsa": ghsa,
                "mal": mal,
                "malformed": outcome.malformed,
                "out_of_window": outcome.out_of_window,
                "skipped": outcome.skipped,
                "summary_file": summary_file.display().to_string(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).expect("Failed to serialize to JSON")
            );
        }
        OutputFormat::Text => {
            println!();
            println!(
                "{}",
                style(format!(
                    "Extracted {} advisories ({ghsa} GHSA, {mal} MAL)",
                    outcome.advisories.len()
                ))
                .green()
                .bold()
            );
            if outcome.malformed > 0 {
                println!(
                    "  {}",
                    style(format!("{} malformed records skipped", outcome.malformed)).yellow()
                );
            }
            println!(
                "  {}",
                style(format!(
                    "{} outside the recency window, {} outside the scored dataset",
                    outcome.out_of_window, outcome.skipped
                ))
                .dim()
            );
            println!("  {}", style(summary_file.display()).cyan());
            println!();
        }
    }
}

/// Render the result of `osvrank rank`.
pub fn render_rank(artifacts: &RankArtifacts, ctx: &OutputContext) {
    match ctx.format {
        OutputFormat::Json => {
            let output = json!({
                "scored_total": artifacts.scored_total,
                "mal_total": artifacts.mal_total,
                "malformed": artifacts.malformed,
                "top": artifacts.top,
                "ranked_file": artifacts.ranked_file.display().to_string(),
                "chart_file": artifacts.chart_file.as_ref().map(|p| p.display().to_string()),
                "report_file": artifacts.report_file.display().to_string(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).expect("Failed to serialize to JSON")
            );
        }
        OutputFormat::Text => {
            println!();
            if artifacts.top.is_empty() {
                println!(
                    "{}",
                    style("No scored advisories in this batch.").yellow()
                );
            } else {
                println!(
                    "{}",
                    style(format!(
                        "Top {} of {} scored advisories",
                        artifacts.top.len(),
                        artifacts.scored_total
                    ))
                    .bold()
                );
                println!();
                println!("{}", ranked_table(artifacts));
            }
            if artifacts.malformed > 0 {
                println!(
                    "  {}",
                    style(format!(
                        "{} malformed summary rows skipped",
                        artifacts.malformed
                    ))
                    .yellow()
                );
            }
            println!();
            println!("{}", style("Artifacts:").bold());
            println!("  {}", style(artifacts.ranked_file.display()).cyan());
            if let Some(chart) = &artifacts.chart_file {
                println!("  {}", style(chart.display()).cyan());
            }
            println!("  {}", style(artifacts.report_file.display()).cyan());
            println!();
        }
    }
}

/// Build the ranked short-list table for text output.
fn ranked_table(artifacts: &RankArtifacts) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "ID", "Package", "Severity", "Downloads", "Score"]);

    for (i, row) in artifacts.top.iter().enumerate() {
        let severity = row
            .advisory
            .severity
            .map(|s| s.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&row.advisory.id),
            Cell::new(&row.advisory.package),
            Cell::new(severity),
            Cell::new(row.downloads),
            Cell::new(format!("{:.3}", row.score)),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use osvrank_core::{Advisory, ScoredAdvisory, Severity};
    use std::path::PathBuf;

    fn artifacts_with_one_row() -> RankArtifacts {
        RankArtifacts {
            ranked_file: PathBuf::from("outputs/ranked.csv"),
            chart_file: Some(PathBuf::from("outputs/priority_score.svg")),
            report_file: PathBuf::from("outputs/analysis_report.txt"),
            top: vec![ScoredAdvisory {
                advisory: Advisory {
                    id: "GHSA-aaaa-bbbb-cccc".to_string(),
                    kind: AdvisoryKind::Ghsa,
                    package: "foo".to_string(),
                    ecosystem: "npm".to_string(),
                    published: Utc::now(),
                    summary: "Prototype Pollution in foo".to_string(),
                    severity: Some(Severity::Critical),
                    cwe_ids: vec![],
                },
                severity_norm: 1.0,
                weapon_flag: 1.0,
                downloads: 1000,
                downloads_norm: 1.0,
                score: 1.0,
            }],
            scored_total: 1,
            mal_total: 0,
            malformed: 0,
        }
    }

    #[test]
    fn test_ranked_table_contains_row() {
        let table = ranked_table(&artifacts_with_one_row());
        let rendered = table.to_string();

        assert!(rendered.contains("GHSA-aaaa-bbbb-cccc"));
        assert!(rendered.contains("foo"));
        assert!(rendered.contains("1.000"));
    }
}
