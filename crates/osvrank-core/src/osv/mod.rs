// SPDX-License-Identifier: Apache-2.0

//! OSV snapshot ingestion: archive download, extraction, and the advisory
//! data model.

pub mod extract;
pub mod snapshot;
pub mod types;

pub use extract::{extract_snapshot, extract_snapshot_at, ExtractOutcome};
pub use snapshot::{extract_archive, fetch_snapshot};
pub use types::{Advisory, AdvisoryKind, Severity};
