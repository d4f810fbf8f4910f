//! Baseline computation
//!
//! A baseline is the average view count a video is compared against. It is
//! the mean of a lookback sample when one exists; otherwise the configured
//! [`BaselinePolicy`] decides the fallback.

use crate::data_model::{ChannelStats, VideoStats};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Baseline used by [`BaselinePolicy::Sentinel`]. Scores become raw view counts.
pub const SENTINEL_BASELINE: f64 = 1.0;

/// Arithmetic mean of `view_count` over the sample, `None` when empty.
pub fn compute_baseline(sample: &[VideoStats]) -> Option<f64> {
    if sample.is_empty() {
        return None;
    }
    let total: f64 = sample.iter().map(|v| v.view_count as f64).sum();
    Some(total / sample.len() as f64)
}

/// Fallback applied when the lookback sample is empty.
///
/// There is intentionally no `Default`: every configuration names one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselinePolicy {
    /// `total_view_count / max(video_count, 1)` of the owning channel
    LifetimeAverage,
    /// Fixed baseline of 1, effectively disabling scoring
    Sentinel,
}

impl BaselinePolicy {
    /// Mean of the sample, or this policy's fallback for an empty sample.
    pub fn resolve(&self, sample: &[VideoStats], channel: &ChannelStats) -> Baseline {
        match compute_baseline(sample) {
            Some(views) => Baseline::from_sample(views, sample.len()),
            None => {
                debug!(
                    channel_id = %channel.channel_id,
                    policy = %self,
                    "empty lookback sample, applying fallback baseline"
                );
                self.fallback(channel)
            }
        }
    }

    pub fn fallback(&self, channel: &ChannelStats) -> Baseline {
        match self {
            BaselinePolicy::LifetimeAverage => Baseline::lifetime_average(channel),
            BaselinePolicy::Sentinel => Baseline::sentinel(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BaselinePolicy::LifetimeAverage => "lifetime_average",
            BaselinePolicy::Sentinel => "sentinel",
        }
    }
}

impl fmt::Display for BaselinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a baseline value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaselineSource {
    Sample { size: usize },
    LifetimeAverage,
    Sentinel,
}

impl BaselineSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, BaselineSource::Sample { .. })
    }

    /// Whether `policy` could have produced a baseline from this source.
    pub fn allowed_by(&self, policy: BaselinePolicy) -> bool {
        match self {
            BaselineSource::Sample { .. } => true,
            BaselineSource::LifetimeAverage => policy == BaselinePolicy::LifetimeAverage,
            BaselineSource::Sentinel => policy == BaselinePolicy::Sentinel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub views: f64,
    pub source: BaselineSource,
}

impl Baseline {
    pub fn from_sample(views: f64, size: usize) -> Self {
        Self {
            views: views.max(0.0),
            source: BaselineSource::Sample { size },
        }
    }

    pub fn lifetime_average(channel: &ChannelStats) -> Self {
        Self {
            views: channel.lifetime_average(),
            source: BaselineSource::LifetimeAverage,
        }
    }

    pub fn sentinel() -> Self {
        Self {
            views: SENTINEL_BASELINE,
            source: BaselineSource::Sentinel,
        }
    }
}
