//! Workflows: gather candidates from a [`StatsProvider`] and run the pipeline
//!
//! - `saved_channels`: the uploads of a short list of channels, each judged
//!   against its own recent uploads
//! - `research`: the union of keyword searches, each video judged against
//!   its owning channel
//!
//! Upstream gaps never abort a run. Unknown ids and provider failures are
//! logged and end up in [`ResultSet::skipped`].

use crate::context::RunContext;
use crate::result::{ResultSet, SkipKind, SkippedEntity};
use crate::runner::{Candidate, OutlierPipeline};
use outlier_core::{ChannelStats, OutlierError, VideoStats};
use outlier_provider::{parse_channel_id, parse_list, StatsProvider};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// A channel together with the videos fetched on its behalf
struct ChannelBatch {
    channel: ChannelStats,
    candidates: Vec<VideoStats>,
    sample: Vec<VideoStats>,
}

#[derive(Default)]
struct Skips(Vec<SkippedEntity>);

impl Skips {
    fn record(&mut self, kind: SkipKind, id: &str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(kind = %kind, id = %id, reason = %reason, "skipping");
        self.0.push(SkippedEntity::new(kind, id, reason));
    }
}

/// Score the recent uploads of saved channels.
///
/// `inputs` are raw channel ids or channel URLs; duplicates are dropped and
/// only the first `max_channels_per_fetch` are processed. Each channel's
/// baseline comes from its first `lookback_sample_size` uploads.
pub fn saved_channels<P: StatsProvider + ?Sized>(
    provider: &P,
    pipeline: &OutlierPipeline,
    inputs: &[String],
    ctx: &RunContext,
) -> Result<ResultSet, OutlierError> {
    let config = pipeline.config();
    let mut skips = Skips::default();

    let mut ids = dedupe(inputs.iter().filter_map(|input| parse_channel_id(input)));
    if ids.len() > config.max_channels_per_fetch {
        for id in ids.split_off(config.max_channels_per_fetch) {
            skips.record(SkipKind::Channel, &id, "over max_channels_per_fetch");
        }
    }

    info!(
        run_id = %ctx.run_id,
        channels = ids.len(),
        "fetching saved channels"
    );

    let fetch = config.per_channel_video_cap.max(config.lookback_sample_size);
    let mut batches = Vec::with_capacity(ids.len());

    for id in &ids {
        let Some(channel) = lookup_channel(provider, id, &mut skips) else {
            continue;
        };

        let uploads = match provider.uploads(&channel, fetch) {
            Ok(uploads) => uploads,
            Err(e) => {
                skips.record(SkipKind::Channel, id, e.to_string());
                continue;
            }
        };
        if uploads.is_empty() {
            skips.record(SkipKind::Channel, id, "no uploads");
            continue;
        }

        let details = match provider.videos(&uploads) {
            Ok(videos) => index_by_id(videos),
            Err(e) => {
                skips.record(SkipKind::Channel, id, e.to_string());
                continue;
            }
        };

        let pick = |wanted: &[String]| -> Vec<VideoStats> {
            wanted.iter().filter_map(|v| details.get(v).cloned()).collect()
        };
        let cap = config.per_channel_video_cap.min(uploads.len());
        let lookback = config.lookback_sample_size.min(uploads.len());

        for missing in uploads[..cap].iter().filter(|v| !details.contains_key(*v)) {
            skips.record(SkipKind::Video, missing, "not found");
        }

        batches.push(ChannelBatch {
            candidates: pick(&uploads[..cap]),
            sample: pick(&uploads[..lookback]),
            channel,
        });
    }

    let candidates = batches
        .iter()
        .flat_map(|batch| {
            batch
                .candidates
                .iter()
                .cloned()
                .map(move |video| pipeline.candidate(video, &batch.channel, &batch.sample))
        })
        .collect();

    Ok(pipeline.run(candidates, ctx)?.with_skipped(skips.0))
}

/// Score a keyword-search candidate pool.
///
/// Hits are de-duplicated across keywords. Every video is judged against
/// the lookback sample of its owning channel; videos whose channel cannot be
/// fetched are skipped.
pub fn research<P: StatsProvider + ?Sized>(
    provider: &P,
    pipeline: &OutlierPipeline,
    keywords: &[String],
    ctx: &RunContext,
) -> Result<ResultSet, OutlierError> {
    let config = pipeline.config();
    let mut skips = Skips::default();

    let keywords = dedupe(
        keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string),
    );

    let mut hits = Vec::new();
    for keyword in &keywords {
        match provider.search(keyword, config.search_results_per_keyword) {
            Ok(ids) => hits.extend(ids),
            Err(e) => skips.record(SkipKind::Keyword, keyword, e.to_string()),
        }
    }
    let pool = dedupe(hits);

    info!(
        run_id = %ctx.run_id,
        keywords = keywords.len(),
        pool = pool.len(),
        "research candidate pool gathered"
    );

    let videos = match provider.videos(&pool) {
        Ok(videos) => videos,
        Err(e) => {
            let reason = e.to_string();
            for id in &pool {
                skips.record(SkipKind::Video, id, reason.clone());
            }
            Vec::new()
        }
    };
    let found: HashSet<&str> = videos.iter().map(|v| v.video_id.as_str()).collect();
    for id in pool.iter().filter(|id| !found.contains(id.as_str())) {
        skips.record(SkipKind::Video, id, "not found");
    }

    let mut by_channel: Vec<(String, Vec<VideoStats>)> = Vec::new();
    for video in videos {
        let slot = by_channel.iter().position(|(id, _)| *id == video.channel_id);
        match slot {
            Some(i) => by_channel[i].1.push(video),
            None => by_channel.push((video.channel_id.clone(), vec![video])),
        }
    }

    let mut batches = Vec::with_capacity(by_channel.len());
    for (channel_id, group) in by_channel {
        let sample = lookup_channel(provider, &channel_id, &mut skips).and_then(|channel| {
            match lookback_sample(provider, &channel, config.lookback_sample_size) {
                Ok(sample) => Some((channel, sample)),
                Err(e) => {
                    skips.record(SkipKind::Channel, &channel_id, e.to_string());
                    None
                }
            }
        });

        match sample {
            Some((channel, sample)) => batches.push(ChannelBatch {
                channel,
                candidates: group,
                sample,
            }),
            None => {
                for video in &group {
                    skips.record(
                        SkipKind::Video,
                        &video.video_id,
                        format!("channel {} unavailable", channel_id),
                    );
                }
            }
        }
    }

    let candidates: Vec<Candidate<'_>> = batches
        .iter()
        .flat_map(|batch| {
            batch
                .candidates
                .iter()
                .cloned()
                .map(move |video| pipeline.candidate(video, &batch.channel, &batch.sample))
        })
        .collect();

    Ok(pipeline.run(candidates, ctx)?.with_skipped(skips.0))
}

/// [`saved_channels`] over comma-separated channel ids or URLs.
pub fn saved_channels_from_text<P: StatsProvider + ?Sized>(
    provider: &P,
    pipeline: &OutlierPipeline,
    raw: &str,
    ctx: &RunContext,
) -> Result<ResultSet, OutlierError> {
    saved_channels(provider, pipeline, &parse_list(raw), ctx)
}

/// [`research`] over comma-separated keywords.
pub fn research_from_text<P: StatsProvider + ?Sized>(
    provider: &P,
    pipeline: &OutlierPipeline,
    raw: &str,
    ctx: &RunContext,
) -> Result<ResultSet, OutlierError> {
    research(provider, pipeline, &parse_list(raw), ctx)
}

fn lookup_channel<P: StatsProvider + ?Sized>(
    provider: &P,
    channel_id: &str,
    skips: &mut Skips,
) -> Option<ChannelStats> {
    match provider.channel(channel_id) {
        Ok(Some(channel)) => Some(channel),
        Ok(None) => {
            skips.record(SkipKind::Channel, channel_id, "not found");
            None
        }
        Err(e) => {
            skips.record(SkipKind::Channel, channel_id, e.to_string());
            None
        }
    }
}

fn lookback_sample<P: StatsProvider + ?Sized>(
    provider: &P,
    channel: &ChannelStats,
    size: usize,
) -> Result<Vec<VideoStats>, OutlierError> {
    let ids = provider.uploads(channel, size)?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    provider.videos(&ids)
}

fn index_by_id(videos: Vec<VideoStats>) -> HashMap<String, VideoStats> {
    videos
        .into_iter()
        .map(|v| (v.video_id.clone(), v))
        .collect()
}

/// Drop repeated ids, keeping first occurrences in order.
fn dedupe(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
