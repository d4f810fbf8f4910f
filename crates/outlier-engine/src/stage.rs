//! Stage Trait: one step of the selection pipeline
//!
//! Every stage consumes the previous stage's videos and hands back a new
//! vector; none of them touch shared state.

use crate::config::{CapStrategy, EngineConfig};
use crate::context::RunContext;
use outlier_core::ScoredVideo;
use outlier_filter::{
    partition, rank_with_rng, sample_random_with_rng, Criterion, DatePreset, FilterCriteria,
    SortOrder,
};
use std::collections::BTreeMap;

pub trait Stage: Send + Sync {
    /// Unique stage id (e.g. "filter.criteria.v1")
    fn id(&self) -> &'static str;

    /// Whether the same input always yields the same output
    fn deterministic(&self) -> bool {
        true
    }

    fn run(&self, videos: Vec<ScoredVideo>, ctx: &RunContext) -> StageOutput;
}

#[derive(Debug, Default)]
pub struct StageOutput {
    pub videos: Vec<ScoredVideo>,
    /// Videos dropped, per criterion that dropped them
    pub rejected: BTreeMap<Criterion, usize>,
}

impl StageOutput {
    pub fn passthrough(videos: Vec<ScoredVideo>) -> Self {
        Self {
            videos,
            rejected: BTreeMap::new(),
        }
    }
}

pub struct FilterStage {
    criteria: FilterCriteria,
    date_preset: DatePreset,
}

impl FilterStage {
    pub fn new(criteria: FilterCriteria, date_preset: DatePreset) -> Self {
        Self {
            criteria,
            date_preset,
        }
    }
}

impl Stage for FilterStage {
    fn id(&self) -> &'static str {
        "filter.criteria.v1"
    }

    fn run(&self, videos: Vec<ScoredVideo>, ctx: &RunContext) -> StageOutput {
        let criteria = self
            .criteria
            .clone()
            .with_cutoff(self.date_preset.cutoff(ctx.now));
        let (kept, dropped) = partition(videos, &criteria);
        let mut rejected = BTreeMap::new();
        for (_, criterion) in dropped {
            *rejected.entry(criterion).or_insert(0) += 1;
        }
        StageOutput {
            videos: kept,
            rejected,
        }
    }
}

pub struct SampleStage {
    size: usize,
}

impl Stage for SampleStage {
    fn id(&self) -> &'static str {
        "sample.random.v1"
    }

    fn deterministic(&self) -> bool {
        false
    }

    fn run(&self, videos: Vec<ScoredVideo>, ctx: &RunContext) -> StageOutput {
        let mut rng = ctx.rng(self.id());
        StageOutput::passthrough(sample_random_with_rng(videos, self.size, &mut rng))
    }
}

pub struct RankStage {
    order: SortOrder,
}

impl Stage for RankStage {
    fn id(&self) -> &'static str {
        match self.order {
            SortOrder::Random => "rank.random.v1",
            SortOrder::ViewsDescending => "rank.views.v1",
            SortOrder::OutlierScoreDescending => "rank.outlier.v1",
            SortOrder::PublishedDescending => "rank.published.v1",
        }
    }

    fn deterministic(&self) -> bool {
        self.order.is_deterministic()
    }

    fn run(&self, videos: Vec<ScoredVideo>, ctx: &RunContext) -> StageOutput {
        let mut rng = ctx.rng(self.id());
        StageOutput::passthrough(rank_with_rng(videos, self.order, &mut rng))
    }
}

pub struct TruncateStage {
    cap: usize,
}

impl Stage for TruncateStage {
    fn id(&self) -> &'static str {
        "cap.top.v1"
    }

    fn run(&self, mut videos: Vec<ScoredVideo>, _ctx: &RunContext) -> StageOutput {
        videos.truncate(self.cap);
        StageOutput::passthrough(videos)
    }
}

/// filter → [sample] → rank → [truncate], as the config asks.
pub fn stages_for(config: &EngineConfig) -> Vec<Box<dyn Stage>> {
    let mut stages: Vec<Box<dyn Stage>> = vec![Box::new(FilterStage::new(
        config.criteria.clone(),
        config.date_preset,
    ))];

    if let (Some(cap), CapStrategy::RandomSample) = (config.result_cap, config.cap_strategy) {
        stages.push(Box::new(SampleStage { size: cap }));
    }

    stages.push(Box::new(RankStage {
        order: config.order,
    }));

    if let (Some(cap), CapStrategy::Top) = (config.result_cap, config.cap_strategy) {
        stages.push(Box::new(TruncateStage { cap }));
    }

    stages
}
