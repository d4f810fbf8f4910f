//! Result Set: the ordered output of one run plus its audit trail
use chrono::{DateTime, Utc};
use outlier_core::{BaselinePolicy, ScoredVideo};
use outlier_filter::{Criterion, SortOrder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// What one stage did to the candidate set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub id: String,
    pub input_count: usize,
    pub output_count: usize,
    pub in_hash: String,
    pub out_hash: String,
    pub deterministic: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rejected: BTreeMap<Criterion, usize>,
}

impl StageReport {
    pub fn dropped(&self) -> usize {
        self.input_count.saturating_sub(self.output_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    Channel,
    Video,
    Keyword,
}

impl fmt::Display for SkipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipKind::Channel => "channel",
            SkipKind::Video => "video",
            SkipKind::Keyword => "keyword",
        })
    }
}

/// An input the run could not score, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntity {
    pub kind: SkipKind,
    pub id: String,
    pub reason: String,
}

impl SkippedEntity {
    pub fn new(kind: SkipKind, id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultSet {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub pipeline_id: String,
    pub config_name: String,
    pub baseline_policy: BaselinePolicy,
    pub order: SortOrder,
    pub videos: Vec<ScoredVideo>,
    pub stages: Vec<StageReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEntity>,
    /// blake3 over the ordered `(video_id, outlier_score)` pairs
    pub fingerprint: String,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn videos(&self) -> &[ScoredVideo] {
        &self.videos
    }

    pub fn video_ids(&self) -> Vec<&str> {
        self.videos.iter().map(|v| v.video_id()).collect()
    }

    pub fn stage(&self, id: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.id == id)
    }

    pub fn with_skipped(mut self, skipped: Vec<SkippedEntity>) -> Self {
        self.skipped.extend(skipped);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub(crate) fn fingerprint(videos: &[ScoredVideo]) -> String {
    let mut hasher = blake3::Hasher::new();
    for video in videos {
        hasher.update(format!("{}:{:.2}\n", video.video_id(), video.outlier_score()).as_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}

pub(crate) fn hash_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = blake3::Hasher::new();
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update(b"\n");
    }
    format!("blake3:{}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlier_core::{Baseline, ChannelStats, VideoStats};

    fn scored(id: &str, views: u64) -> ScoredVideo {
        let channel = ChannelStats::new("UC1", "Bench");
        ScoredVideo::new(
            VideoStats::new(id, "UC1", views),
            &channel,
            &Baseline::from_sample(100.0, 1),
        )
    }

    #[test]
    fn test_fingerprint_depends_on_order_and_score() {
        let a = scored("a", 100);
        let b = scored("b", 300);

        let forward = fingerprint(&[a.clone(), b.clone()]);
        assert_eq!(forward, fingerprint(&[a.clone(), b.clone()]));
        assert_ne!(forward, fingerprint(&[b.clone(), a.clone()]));
        assert_ne!(forward, fingerprint(&[a, scored("b", 301)]));
        assert!(forward.starts_with("blake3:"));
    }

    #[test]
    fn test_id_hash_ignores_scores() {
        let ids = |videos: &[ScoredVideo]| hash_ids(videos.iter().map(|v| v.video_id()));
        assert_eq!(ids(&[scored("a", 1)]), ids(&[scored("a", 999)]));
        assert_ne!(ids(&[]), ids(&[scored("a", 1)]));
    }

    #[test]
    fn test_report_dropped() {
        let report = StageReport {
            id: "filter.criteria.v1".into(),
            input_count: 5,
            output_count: 2,
            in_hash: String::new(),
            out_hash: String::new(),
            deterministic: true,
            latency_ms: 0,
            rejected: BTreeMap::new(),
        };
        assert_eq!(report.dropped(), 3);
    }
}
