//! Outlier Pipeline: scores candidates, then chains the selection stages
use crate::config::EngineConfig;
use crate::context::RunContext;
use crate::result::{fingerprint, hash_ids, ResultSet, StageReport};
use crate::stage::{stages_for, Stage};
use outlier_core::{Baseline, ChannelStats, OutlierError, ScoredVideo, VideoStats};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

pub const SCORE_STAGE_ID: &str = "score.outlier.v1";

/// A video paired with its owning channel and the baseline it is judged by
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub video: VideoStats,
    pub channel: &'a ChannelStats,
    pub baseline: Baseline,
}

impl<'a> Candidate<'a> {
    pub fn new(video: VideoStats, channel: &'a ChannelStats, baseline: Baseline) -> Self {
        Self {
            video,
            channel,
            baseline,
        }
    }

    pub fn score(self) -> ScoredVideo {
        ScoredVideo::new(self.video, self.channel, &self.baseline)
    }
}

pub struct OutlierPipeline {
    config: EngineConfig,
    stages: Vec<Box<dyn Stage>>,
    pipeline_id: String,
}

impl OutlierPipeline {
    /// Validates the configuration and lays out its stages.
    pub fn new(config: EngineConfig) -> Result<Self, OutlierError> {
        config.validate()?;
        let stages = stages_for(&config);

        let pipeline_id = std::iter::once(SCORE_STAGE_ID)
            .chain(stages.iter().map(|s| s.id()))
            .map(|id| id.split('.').next().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join("→");

        Ok(Self {
            config,
            stages,
            pipeline_id,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    /// Candidate whose baseline is the lookback `sample`, or the configured
    /// fallback when the sample is empty.
    pub fn candidate<'a>(
        &self,
        video: VideoStats,
        channel: &'a ChannelStats,
        sample: &[VideoStats],
    ) -> Candidate<'a> {
        let baseline = self.config.baseline_policy.resolve(sample, channel);
        Candidate::new(video, channel, baseline)
    }

    pub fn run(
        &self,
        candidates: Vec<Candidate<'_>>,
        ctx: &RunContext,
    ) -> Result<ResultSet, OutlierError> {
        let policy = self.config.baseline_policy;
        if let Some(stray) = candidates
            .iter()
            .find(|c| !c.baseline.source.allowed_by(policy))
        {
            return Err(OutlierError::invalid(format!(
                "{}: video {} carries a {:?} baseline under the {} policy",
                self.config.name, stray.video.video_id, stray.baseline.source, policy
            )));
        }

        info!(
            run_id = %ctx.run_id,
            pipeline = %self.pipeline_id,
            candidates = candidates.len(),
            "outlier pipeline started"
        );

        let mut reports = Vec::with_capacity(self.stages.len() + 1);

        let start = Instant::now();
        let input_count = candidates.len();
        let in_hash = hash_ids(candidates.iter().map(|c| c.video.video_id.as_str()));
        let mut current: Vec<ScoredVideo> = candidates.into_iter().map(Candidate::score).collect();
        reports.push(StageReport {
            id: SCORE_STAGE_ID.to_string(),
            input_count,
            output_count: current.len(),
            in_hash,
            out_hash: hash_ids(current.iter().map(|v| v.video_id())),
            deterministic: true,
            latency_ms: start.elapsed().as_millis() as u64,
            rejected: BTreeMap::new(),
        });

        for stage in &self.stages {
            let start = Instant::now();
            let input_count = current.len();
            let in_hash = hash_ids(current.iter().map(|v| v.video_id()));

            let output = stage.run(current, ctx);

            let report = StageReport {
                id: stage.id().to_string(),
                input_count,
                output_count: output.videos.len(),
                in_hash,
                out_hash: hash_ids(output.videos.iter().map(|v| v.video_id())),
                deterministic: stage.deterministic(),
                latency_ms: start.elapsed().as_millis() as u64,
                rejected: output.rejected,
            };
            debug!(
                stage = %report.id,
                input = report.input_count,
                output = report.output_count,
                "stage finished"
            );
            reports.push(report);

            current = output.videos;
        }

        info!(
            run_id = %ctx.run_id,
            kept = current.len(),
            "outlier pipeline finished"
        );

        Ok(ResultSet {
            run_id: ctx.run_id,
            generated_at: ctx.now,
            pipeline_id: self.pipeline_id.clone(),
            config_name: self.config.name.clone(),
            baseline_policy: policy,
            order: self.config.order,
            fingerprint: fingerprint(&current),
            videos: current,
            stages: reports,
            skipped: Vec::new(),
        })
    }
}
