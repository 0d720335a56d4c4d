// SPDX-License-Identifier: Apache-2.0

//! Priority scoring: severity and exposure normalizers, weaponization
//! detection, and the composite scorer.

pub mod exposure;
pub mod scorer;
pub mod severity;
pub mod weapon;

pub use exposure::{
    min_max_scale, resolve_downloads, DisabledDownloads, DownloadProvider, NpmDownloads,
    StaticDownloads,
};
pub use scorer::{score_batch, top_n, ScoreWeights, ScoredAdvisory, ScoringConfig};
