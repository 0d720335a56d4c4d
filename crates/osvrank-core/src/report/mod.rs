// SPDX-License-Identifier: Apache-2.0

//! Output artifact emitters: CSV tables, priority chart, text report.

pub mod chart;
pub mod csv;
pub mod text;

pub use chart::write_chart;
pub use csv::{read_summary, write_ranked, write_summary, SummaryReadOutcome};
pub use text::{render_report, write_report, ReportInput};
