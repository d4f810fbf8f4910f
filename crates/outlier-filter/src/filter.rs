//! Apply [`FilterCriteria`] to scored videos

use crate::criteria::{Criterion, FilterCriteria};
use outlier_core::ScoredVideo;
use tracing::debug;

/// Criteria with keywords lowered once per call.
struct Matcher<'a> {
    criteria: &'a FilterCriteria,
    include_keywords: Vec<String>,
    exclude_keywords: Vec<String>,
}

impl<'a> Matcher<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        let lower = |set: &std::collections::BTreeSet<String>| {
            set.iter().map(|k| k.to_lowercase()).collect::<Vec<_>>()
        };
        Self {
            criteria,
            include_keywords: lower(&criteria.include_title_keywords),
            exclude_keywords: lower(&criteria.exclude_title_keywords),
        }
    }

    fn rejection(&self, video: &ScoredVideo) -> Option<Criterion> {
        let c = self.criteria;

        if let Some(min) = c.min_view_count {
            if video.view_count() < min {
                return Some(Criterion::MinViewCount);
            }
        }

        if let Some(min) = c.min_subscriber_count {
            if video.channel().subscriber_count < min {
                return Some(Criterion::MinSubscriberCount);
            }
        }

        if let Some(ratio) = c.min_view_to_subscriber_ratio {
            if video.view_to_subscriber_ratio() < ratio {
                return Some(Criterion::MinViewToSubscriberRatio);
            }
        }

        if let Some(threshold) = c.min_outlier_score {
            if video.outlier_score() < threshold {
                return Some(Criterion::MinOutlierScore);
            }
        }

        if let Some(kind) = c.content_kind {
            if video.content_kind() != kind {
                return Some(Criterion::ContentKind);
            }
        }

        if !self.include_keywords.is_empty() || !self.exclude_keywords.is_empty() {
            let title = video.title().to_lowercase();
            if !self.include_keywords.is_empty()
                && !self.include_keywords.iter().any(|k| title.contains(k.as_str()))
            {
                return Some(Criterion::IncludeTitleKeywords);
            }
            if self.exclude_keywords.iter().any(|k| title.contains(k.as_str())) {
                return Some(Criterion::ExcludeTitleKeywords);
            }
        }

        let channel_id = &video.channel().channel_id;
        if !c.include_channel_ids.is_empty() && !c.include_channel_ids.contains(channel_id) {
            return Some(Criterion::IncludeChannelIds);
        }
        if c.exclude_channel_ids.contains(channel_id) {
            return Some(Criterion::ExcludeChannelIds);
        }

        // An unknown publish time cannot satisfy a date bound.
        if let Some(after) = c.published_after {
            match video.published_at() {
                Some(at) if at >= after => {}
                _ => return Some(Criterion::PublishedAfter),
            }
        }
        if let Some(before) = c.published_before {
            match video.published_at() {
                Some(at) if at <= before => {}
                _ => return Some(Criterion::PublishedBefore),
            }
        }

        None
    }
}

/// Keep the videos that satisfy every set criterion, in input order.
pub fn filter(videos: Vec<ScoredVideo>, criteria: &FilterCriteria) -> Vec<ScoredVideo> {
    if criteria.is_empty() {
        return videos;
    }
    let matcher = Matcher::new(criteria);
    videos
        .into_iter()
        .filter(|v| matcher.rejection(v).is_none())
        .collect()
}

/// The first criterion `video` fails, or `None` if it is kept.
pub fn rejection(video: &ScoredVideo, criteria: &FilterCriteria) -> Option<Criterion> {
    Matcher::new(criteria).rejection(video)
}

/// Split into kept videos and the criterion that rejected each dropped one.
pub fn partition(
    videos: Vec<ScoredVideo>,
    criteria: &FilterCriteria,
) -> (Vec<ScoredVideo>, Vec<(ScoredVideo, Criterion)>) {
    let matcher = Matcher::new(criteria);
    let mut kept = Vec::with_capacity(videos.len());
    let mut rejected = Vec::new();
    for video in videos {
        match matcher.rejection(&video) {
            None => kept.push(video),
            Some(criterion) => rejected.push((video, criterion)),
        }
    }
    debug!(kept = kept.len(), rejected = rejected.len(), "filter applied");
    (kept, rejected)
}
