//! Ordering and random sampling
//!
//! Deterministic orders use a stable sort, so ties keep their input order.
//! `Random` and [`sample_random`] draw a fresh thread RNG on every call;
//! the `_with_rng` variants take a caller-provided generator.

use outlier_core::ScoredVideo;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Random,
    ViewsDescending,
    OutlierScoreDescending,
    PublishedDescending,
}

impl SortOrder {
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, SortOrder::Random)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortOrder::Random => "Random",
            SortOrder::ViewsDescending => "Views",
            SortOrder::OutlierScoreDescending => "Outlier Score",
            SortOrder::PublishedDescending => "Published",
        };
        f.write_str(label)
    }
}

pub fn rank(videos: Vec<ScoredVideo>, order: SortOrder) -> Vec<ScoredVideo> {
    rank_with_rng(videos, order, &mut rand::thread_rng())
}

pub fn rank_with_rng<R: Rng + ?Sized>(
    mut videos: Vec<ScoredVideo>,
    order: SortOrder,
    rng: &mut R,
) -> Vec<ScoredVideo> {
    match order {
        SortOrder::Random => videos.shuffle(rng),
        SortOrder::ViewsDescending => videos.sort_by(|a, b| b.view_count().cmp(&a.view_count())),
        SortOrder::OutlierScoreDescending => {
            videos.sort_by(|a, b| b.outlier_score().total_cmp(&a.outlier_score()))
        }
        // `None < Some`, so undated videos end up last.
        SortOrder::PublishedDescending => {
            videos.sort_by(|a, b| b.published_at().cmp(&a.published_at()))
        }
    }
    videos
}

/// Uniform sample of `min(n, len)` videos without replacement.
pub fn sample_random(videos: Vec<ScoredVideo>, n: usize) -> Vec<ScoredVideo> {
    sample_random_with_rng(videos, n, &mut rand::thread_rng())
}

pub fn sample_random_with_rng<R: Rng + ?Sized>(
    videos: Vec<ScoredVideo>,
    n: usize,
    rng: &mut R,
) -> Vec<ScoredVideo> {
    let amount = n.min(videos.len());
    if amount == videos.len() {
        let mut all = videos;
        all.shuffle(rng);
        return all;
    }
    let mut slots: Vec<Option<ScoredVideo>> = videos.into_iter().map(Some).collect();
    index::sample(rng, slots.len(), amount)
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
