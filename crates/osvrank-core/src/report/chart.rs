// SPDX-License-Identifier: Apache-2.0

//! Priority chart rendering.
//!
//! Renders the top scored rows as a horizontal bar chart. The SVG backend
//! keeps the artifact self-contained: text becomes `<text>` elements, so
//! rendering never depends on system font discovery.

use std::path::Path;

use plotters::prelude::*;
use tracing::{debug, warn};

use crate::error::OsvRankError;
use crate::score::ScoredAdvisory;

/// Chart canvas width in pixels.
const CHART_WIDTH: u32 = 960;
/// Vertical pixels per bar.
const BAR_HEIGHT: u32 = 36;

fn chart_error<E: std::fmt::Display>(err: E) -> OsvRankError {
    OsvRankError::Chart {
        message: err.to_string(),
    }
}

/// Write a horizontal bar chart of the top `top` scores to `path`.
///
/// Returns `false` without writing anything when the batch is empty
/// (empty runs still succeed; the chart is the one artifact skipped).
///
/// # Errors
///
/// Returns `OsvRankError::Chart` if rendering fails, or an I/O error if
/// the output directory cannot be created.
pub fn write_chart(
    path: &Path,
    ranked: &[ScoredAdvisory],
    top: usize,
) -> Result<bool, OsvRankError> {
    let rows = &ranked[..ranked.len().min(top)];
    if rows.is_empty() {
        warn!("No scored advisories - skipping chart");
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Bottom-up so the highest score renders as the topmost bar.
    let bars: Vec<(&str, f64)> = rows
        .iter()
        .rev()
        .map(|r| (r.advisory.package.as_str(), r.score))
        .collect();

    let height = 100 + BAR_HEIGHT * bars.len() as u32;
    let path_display = path.to_string_lossy().to_string();

    let root = SVGBackend::new(&path_display, (CHART_WIDTH, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Priority short-list (top {})", rows.len()),
            ("sans-serif", 22),
        )
        .margin(16)
        .x_label_area_size(44)
        .y_label_area_size(240)
        .build_cartesian_2d(0.0f64..1.0f64, 0usize..bars.len())
        .map_err(chart_error)?;

    let labels: Vec<String> = bars.iter().map(|(pkg, _)| (*pkg).to_string()).collect();
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Priority score (0-1)")
        .y_labels(bars.len())
        .y_label_formatter(&|idx: &usize| labels.get(*idx).cloned().unwrap_or_default())
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, score))| {
            Rectangle::new([(0.0, i), (*score, i + 1)], BLUE.mix(0.6).filled())
        }))
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    debug!(path = %path.display(), bars = bars.len(), "Chart written");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osv::{Advisory, AdvisoryKind, Severity};
    use chrono::Utc;

    fn scored(id: &str, package: &str, score: f64) -> ScoredAdvisory {
        ScoredAdvisory {
            advisory: Advisory {
                id: id.to_string(),
                kind: AdvisoryKind::Ghsa,
                package: package.to_string(),
                ecosystem: "npm".to_string(),
                published: Utc::now(),
                summary: String::new(),
                severity: Some(Severity::High),
                cwe_ids: Vec::new(),
            },
            severity_norm: 0.8,
            weapon_flag: 0.0,
            downloads: 0,
            downloads_norm: 0.0,
            score,
        }
    }

    #[test]
    fn test_write_chart_produces_svg() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("priority_score.svg");

        let ranked = vec![scored("GHSA-a", "left-pad", 0.9), scored("GHSA-b", "lodash", 0.4)];
        let written = write_chart(&path, &ranked, 10).expect("chart");

        assert!(written);
        let contents = std::fs::read_to_string(&path).expect("read back");
        assert!(contents.contains("<svg"));
        assert!(contents.contains("left-pad"));
        assert!(contents.contains("lodash"));
    }

    #[test]
    fn test_write_chart_caps_at_top() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("priority_score.svg");

        let ranked: Vec<ScoredAdvisory> = (0..15)
            .map(|i| scored(&format!("GHSA-{i}"), &format!("pkg{i}"), 1.0 - 0.01 * f64::from(i)))
            .collect();
        let written = write_chart(&path, &ranked, 10).expect("chart");

        assert!(written);
        let contents = std::fs::read_to_string(&path).expect("read back");
        assert!(contents.contains("pkg0"));
        assert!(contents.contains("pkg9"));
        assert!(!contents.contains("pkg14"));
    }

    #[test]
    fn test_write_chart_empty_batch_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("priority_score.svg");

        let written = write_chart(&path, &[], 10).expect("chart");
        assert!(!written);
        assert!(!path.exists());
    }
}
