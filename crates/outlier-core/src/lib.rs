//! Outlier Core: data model, baseline and scoring
//!
//! Pure building blocks shared by every other crate in the workspace.
//!
//! ```text
//! VideoStats ─┐
//!             ├─ BaselinePolicy::resolve ─→ Baseline ─→ score ─→ ScoredVideo
//! ChannelStats┘                                          ↑
//!                                               classify ┘
//! ```

pub mod baseline;
pub mod data_model;
pub mod error;
pub mod scoring;

pub use baseline::{compute_baseline, Baseline, BaselinePolicy, BaselineSource};
pub use data_model::{ChannelSnapshot, ChannelStats, ScoredVideo, VideoStats};
pub use error::OutlierError;
pub use scoring::{
    classify, score, view_to_subscriber_ratio, ContentKind, SHORT_MAX_SECONDS,
    UNKNOWN_DURATION_KIND,
};

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, OutlierError>;
