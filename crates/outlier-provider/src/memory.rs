//! Fixture-backed provider
//!
//! Serves statistics from memory. Loaded from a YAML document shaped like
//! [`StatsFixture`]; counts every call so cache behaviour can be asserted.

use crate::parse::parse_iso8601_duration;
use crate::provider::StatsProvider;
use outlier_core::{ChannelStats, OutlierError, VideoStats};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsFixture {
    pub channels: Vec<ChannelStats>,
    pub videos: Vec<FixtureVideo>,
    /// Upload ids per uploads reference, most recent first
    pub uploads: HashMap<String, Vec<String>>,
    /// Result ids per lowercase search keyword
    pub search: HashMap<String, Vec<String>>,
    /// Channel ids whose lookup fails as if the upstream were down
    pub failing_channels: Vec<String>,
}

/// A video record as written in a fixture.
///
/// `duration` takes the ISO-8601 form the platform reports (`PT4M13S`) and
/// wins over `duration_seconds` when both are given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureVideo {
    #[serde(flatten)]
    pub video: VideoStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl FixtureVideo {
    pub fn into_video(self) -> Result<VideoStats, OutlierError> {
        let mut video = self.video;
        if let Some(raw) = self.duration {
            let seconds = parse_iso8601_duration(&raw).ok_or_else(|| {
                OutlierError::Parse(format!("video {}: bad duration {:?}", video.video_id, raw))
            })?;
            video.duration_seconds = Some(seconds);
        }
        Ok(video)
    }
}

impl StatsFixture {
    /// Parses the document and checks every `duration` up front.
    pub fn from_yaml(yaml: &str) -> Result<Self, OutlierError> {
        let fixture: Self =
            serde_yaml::from_str(yaml).map_err(|e| OutlierError::Parse(e.to_string()))?;
        for video in &fixture.videos {
            video.clone().into_video()?;
        }
        Ok(fixture)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, OutlierError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| OutlierError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&text)
    }
}

/// Number of calls served, per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCalls {
    pub channel: usize,
    pub videos: usize,
    pub uploads: usize,
    pub search: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryProvider {
    channels: HashMap<String, ChannelStats>,
    videos: HashMap<String, VideoStats>,
    uploads: HashMap<String, Vec<String>>,
    search: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    channel_calls: AtomicUsize,
    video_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: StatsFixture) -> Self {
        let mut provider = Self::new();
        for channel in fixture.channels {
            provider = provider.with_channel(channel);
        }
        for entry in fixture.videos {
            match entry.into_video() {
                Ok(video) => provider = provider.with_video(video),
                Err(e) => warn!(error = %e, "dropping fixture video"),
            }
        }
        provider.uploads = fixture.uploads;
        provider.search = fixture
            .search
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        provider.failing = fixture.failing_channels.into_iter().collect();
        provider
    }

    pub fn with_channel(mut self, channel: ChannelStats) -> Self {
        self.channels.insert(channel.channel_id.clone(), channel);
        self
    }

    pub fn with_video(mut self, video: VideoStats) -> Self {
        self.videos.insert(video.video_id.clone(), video);
        self
    }

    pub fn with_uploads(mut self, reference: impl Into<String>, video_ids: Vec<String>) -> Self {
        self.uploads.insert(reference.into(), video_ids);
        self
    }

    pub fn with_search(mut self, keyword: &str, video_ids: Vec<String>) -> Self {
        self.search.insert(keyword.trim().to_lowercase(), video_ids);
        self
    }

    pub fn failing_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.failing.insert(channel_id.into());
        self
    }

    pub fn calls(&self) -> ProviderCalls {
        ProviderCalls {
            channel: self.channel_calls.load(Ordering::Relaxed),
            videos: self.video_calls.load(Ordering::Relaxed),
            uploads: self.upload_calls.load(Ordering::Relaxed),
            search: self.search_calls.load(Ordering::Relaxed),
        }
    }
}

impl StatsProvider for InMemoryProvider {
    fn channel(&self, channel_id: &str) -> Result<Option<ChannelStats>, OutlierError> {
        self.channel_calls.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(channel_id) {
            return Err(OutlierError::Provider(format!(
                "channel lookup failed for {}",
                channel_id
            )));
        }
        Ok(self.channels.get(channel_id).cloned())
    }

    fn videos(&self, video_ids: &[String]) -> Result<Vec<VideoStats>, OutlierError> {
        self.video_calls.fetch_add(1, Ordering::Relaxed);
        Ok(video_ids
            .iter()
            .filter_map(|id| self.videos.get(id).cloned())
            .collect())
    }

    fn uploads(&self, channel: &ChannelStats, max: usize) -> Result<Vec<String>, OutlierError> {
        self.upload_calls.fetch_add(1, Ordering::Relaxed);
        Ok(channel
            .uploads_reference
            .as_ref()
            .and_then(|reference| self.uploads.get(reference))
            .map(|ids| ids.iter().take(max).cloned().collect())
            .unwrap_or_default())
    }

    fn search(&self, keyword: &str, max: usize) -> Result<Vec<String>, OutlierError> {
        self.search_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .search
            .get(&keyword.trim().to_lowercase())
            .map(|ids| ids.iter().take(max).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
channels:
  - channel_id: UC1
    title: Workshop
    subscriber_count: 1200
    total_view_count: 90000
    video_count: 30
    uploads_reference: UU1
videos:
  - video_id: a
    channel_id: UC1
    view_count: 10
    duration: PT4M13S
  - video_id: b
    channel_id: UC1
    view_count: 20
    duration_seconds: 45
uploads:
  UU1: [b, a]
search:
  "I Tried": [a]
failing_channels: [UCdown]
"#;

    #[test]
    fn test_fixture_lookup() {
        let provider = InMemoryProvider::from_fixture(StatsFixture::from_yaml(FIXTURE).unwrap());
        let channel = provider.channel("UC1").unwrap().unwrap();
        assert_eq!(channel.subscriber_count, 1200);
        assert_eq!(provider.uploads(&channel, 1).unwrap(), vec!["b"]);
        assert_eq!(provider.search("i tried", 10).unwrap(), vec!["a"]);
        assert_eq!(provider.channel("UCx").unwrap(), None);
        assert!(provider.channel("UCdown").is_err());
    }

    #[test]
    fn test_unknown_videos_are_omitted() {
        let provider = InMemoryProvider::from_fixture(StatsFixture::from_yaml(FIXTURE).unwrap());
        let wanted = vec!["a".to_string(), "zzz".to_string(), "b".to_string()];
        let found: Vec<_> = provider
            .videos(&wanted)
            .unwrap()
            .into_iter()
            .map(|v| v.video_id)
            .collect();
        assert_eq!(found, vec!["a", "b"]);
    }

    #[test]
    fn test_require_channel_reports_missing() {
        let provider = InMemoryProvider::new();
        let err = provider.require_channel("UCghost").unwrap_err();
        assert_eq!(err, OutlierError::missing_channel("UCghost"));
    }

    #[test]
    fn test_iso_durations_resolved() {
        let provider = InMemoryProvider::from_fixture(StatsFixture::from_yaml(FIXTURE).unwrap());
        let wanted = vec!["a".to_string(), "b".to_string()];
        let durations: Vec<_> = provider
            .videos(&wanted)
            .unwrap()
            .into_iter()
            .map(|v| v.duration_seconds)
            .collect();
        assert_eq!(durations, vec![Some(253), Some(45)]);
    }

    #[test]
    fn test_bad_duration_is_parse_error() {
        let yaml = "videos:\n\
                    - video_id: a\n  \
                      channel_id: UC1\n  \
                      view_count: 1\n  \
                      duration: soon\n";
        let err = StatsFixture::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, OutlierError::Parse(ref msg) if msg.contains("soon")));
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        let err = StatsFixture::from_yaml("channels: 12").unwrap_err();
        assert!(matches!(err, OutlierError::Parse(_)));
    }
}
