//! Outlier score and content classification
//!
//! The score is a raw multiplier: `views / baseline`, rounded to two
//! decimals. No log scale, no channel-size weighting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Videos strictly shorter than this are Shorts.
pub const SHORT_MAX_SECONDS: u64 = 60;

/// Kind assigned when the duration could not be determined.
pub const UNKNOWN_DURATION_KIND: ContentKind = ContentKind::LongForm;

/// Coarse classification of a video by duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    LongForm,
    Short,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::LongForm => "long_form",
            ContentKind::Short => "short",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::LongForm => write!(f, "Long-form"),
            ContentKind::Short => write!(f, "Shorts"),
        }
    }
}

/// Classify a video by its duration in seconds.
///
/// Total over its input: a known duration under [`SHORT_MAX_SECONDS`] is a
/// Short, everything else (including an unknown duration) is
/// [`UNKNOWN_DURATION_KIND`] / long-form.
pub fn classify(duration_seconds: Option<u64>) -> ContentKind {
    match duration_seconds {
        Some(secs) if secs < SHORT_MAX_SECONDS => ContentKind::Short,
        Some(_) => ContentKind::LongForm,
        None => UNKNOWN_DURATION_KIND,
    }
}

/// `round(view_count / baseline_views, 2)`, or `0` when the baseline is not
/// positive.
pub fn score(view_count: u64, baseline_views: f64) -> f64 {
    if !(baseline_views > 0.0) || !baseline_views.is_finite() {
        return 0.0;
    }
    round2(view_count as f64 / baseline_views)
}

/// Views per subscriber. A channel with zero (or hidden) subscribers has an
/// infinite ratio, so a ratio threshold never excludes its videos.
pub fn view_to_subscriber_ratio(view_count: u64, subscriber_count: u64) -> f64 {
    if subscriber_count == 0 {
        f64::INFINITY
    } else {
        view_count as f64 / subscriber_count as f64
    }
}

/// Two decimals, exact halves to the even neighbour (0.125 -> 0.12).
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
