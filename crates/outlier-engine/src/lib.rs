//! Outlier Engine: configuration, staged pipeline and workflows
//!
//! One [`EngineConfig`] per invocation; [`OutlierPipeline`] scores the
//! candidates and chains the selection stages, recording a report per stage.

pub mod config;
pub mod context;
pub mod result;
pub mod runner;
pub mod stage;
pub mod workflow;

pub use config::{CapStrategy, EngineConfig};
pub use context::RunContext;
pub use result::{ResultSet, SkipKind, SkippedEntity, StageReport};
pub use runner::{Candidate, OutlierPipeline, SCORE_STAGE_ID};
pub use stage::{Stage, StageOutput};
pub use workflow::{research, research_from_text, saved_channels, saved_channels_from_text};

/// Engine version
pub const ENGINE_VERSION: &str = "1.0.0";
