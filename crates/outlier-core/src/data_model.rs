//! Data Model: ChannelStats, VideoStats, ScoredVideo
use crate::baseline::{Baseline, BaselineSource};
use crate::scoring::{classify, score, view_to_subscriber_ratio, ContentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub channel_id: String,
    pub title: String,
    /// 0 when the owner hides the count
    #[serde(default)]
    pub subscriber_count: u64,
    #[serde(default)]
    pub total_view_count: u64,
    #[serde(default)]
    pub video_count: u64,
    /// Handle to the upload list, only meaningful to the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploads_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl ChannelStats {
    pub fn new(channel_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            title: title.into(),
            subscriber_count: 0,
            total_view_count: 0,
            video_count: 0,
            uploads_reference: None,
            created_at: None,
            thumbnail_url: None,
        }
    }

    pub fn with_subscribers(mut self, count: u64) -> Self {
        self.subscriber_count = count;
        self
    }

    pub fn with_totals(mut self, total_view_count: u64, video_count: u64) -> Self {
        self.total_view_count = total_view_count;
        self.video_count = video_count;
        self
    }

    pub fn with_uploads(mut self, reference: impl Into<String>) -> Self {
        self.uploads_reference = Some(reference.into());
        self
    }

    /// Lifetime views per upload; a zero video count counts as one.
    pub fn lifetime_average(&self) -> f64 {
        self.total_view_count as f64 / self.video_count.max(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStats {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
}

impl VideoStats {
    pub fn new(
        video_id: impl Into<String>,
        channel_id: impl Into<String>,
        view_count: u64,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            title: String::new(),
            published_at: None,
            duration_seconds: None,
            thumbnail_url: None,
            view_count,
            like_count: None,
            comment_count: None,
            channel_id: channel_id.into(),
            channel_title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_URL_PREFIX, self.video_id)
    }
}

/// Channel fields frozen at scoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub channel_id: String,
    pub title: String,
    pub subscriber_count: u64,
    pub total_view_count: u64,
    pub video_count: u64,
}

impl From<&ChannelStats> for ChannelSnapshot {
    fn from(channel: &ChannelStats) -> Self {
        Self {
            channel_id: channel.channel_id.clone(),
            title: channel.title.clone(),
            subscriber_count: channel.subscriber_count,
            total_view_count: channel.total_view_count,
            video_count: channel.video_count,
        }
    }
}

/// A video scored against a baseline.
///
/// Fields are private so a score can never drift from the baseline it was
/// computed with; a new baseline means a new value (see [`ScoredVideo::rescored`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredVideo {
    #[serde(flatten)]
    video: VideoStats,
    watch_url: String,
    content_kind: ContentKind,
    baseline_views: f64,
    baseline_source: BaselineSource,
    outlier_score: f64,
    channel: ChannelSnapshot,
}

impl ScoredVideo {
    pub fn new(video: VideoStats, channel: &ChannelStats, baseline: &Baseline) -> Self {
        let baseline_views = baseline.views.max(0.0);
        Self {
            watch_url: video.watch_url(),
            content_kind: classify(video.duration_seconds),
            outlier_score: score(video.view_count, baseline_views),
            baseline_views,
            baseline_source: baseline.source,
            channel: ChannelSnapshot::from(channel),
            video,
        }
    }

    /// Score the same video and channel snapshot against another baseline.
    pub fn rescored(&self, baseline: &Baseline) -> Self {
        let baseline_views = baseline.views.max(0.0);
        Self {
            video: self.video.clone(),
            watch_url: self.watch_url.clone(),
            content_kind: self.content_kind,
            baseline_views,
            baseline_source: baseline.source,
            outlier_score: score(self.video.view_count, baseline_views),
            channel: self.channel.clone(),
        }
    }

    pub fn video(&self) -> &VideoStats {
        &self.video
    }

    pub fn video_id(&self) -> &str {
        &self.video.video_id
    }

    pub fn title(&self) -> &str {
        &self.video.title
    }

    pub fn view_count(&self) -> u64 {
        self.video.view_count
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.video.published_at
    }

    pub fn watch_url(&self) -> &str {
        &self.watch_url
    }

    pub fn content_kind(&self) -> ContentKind {
        self.content_kind
    }

    pub fn baseline_views(&self) -> f64 {
        self.baseline_views
    }

    pub fn baseline_source(&self) -> BaselineSource {
        self.baseline_source
    }

    pub fn outlier_score(&self) -> f64 {
        self.outlier_score
    }

    pub fn channel(&self) -> &ChannelSnapshot {
        &self.channel
    }

    pub fn view_to_subscriber_ratio(&self) -> f64 {
        view_to_subscriber_ratio(self.video.view_count, self.channel.subscriber_count)
    }
}
