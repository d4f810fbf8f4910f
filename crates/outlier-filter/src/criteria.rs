//! Filter criteria for scored videos
//!
//! Every field is optional. An absent criterion imposes no constraint; set
//! criteria compose by logical AND.

use chrono::{DateTime, Utc};
use outlier_core::{ContentKind, OutlierError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Declarative filter over [`outlier_core::ScoredVideo`]s
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Keep videos with at least this many views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_view_count: Option<u64>,

    /// Keep videos whose channel has at least this many subscribers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_subscriber_count: Option<u64>,

    /// Keep videos with `views / subscribers >= ratio` (zero subscribers always pass)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_view_to_subscriber_ratio: Option<f64>,

    /// Keep videos with `outlier_score >= threshold`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_outlier_score: Option<f64>,

    /// Keep only this kind of content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_kind: Option<ContentKind>,

    /// Case-insensitive substrings; any must occur in the title
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub include_title_keywords: BTreeSet<String>,

    /// Case-insensitive substrings; none may occur in the title
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude_title_keywords: BTreeSet<String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub include_channel_ids: BTreeSet<String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude_channel_ids: BTreeSet<String>,

    /// Inclusive lower bound on the publish time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_after: Option<DateTime<Utc>>,

    /// Inclusive upper bound on the publish time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_before: Option<DateTime<Utc>>,
}

impl FilterCriteria {
    /// Criteria that keep everything
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_min_views(mut self, views: u64) -> Self {
        self.min_view_count = Some(views);
        self
    }

    pub fn with_min_subscribers(mut self, subscribers: u64) -> Self {
        self.min_subscriber_count = Some(subscribers);
        self
    }

    pub fn with_min_ratio(mut self, ratio: f64) -> Self {
        self.min_view_to_subscriber_ratio = Some(ratio);
        self
    }

    pub fn with_min_outlier_score(mut self, threshold: f64) -> Self {
        self.min_outlier_score = Some(threshold);
        self
    }

    pub fn with_content_kind(mut self, kind: ContentKind) -> Self {
        self.content_kind = Some(kind);
        self
    }

    pub fn include_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.include_title_keywords.insert(keyword.into());
        self
    }

    pub fn exclude_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.exclude_title_keywords.insert(keyword.into());
        self
    }

    pub fn include_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.include_channel_ids.insert(channel_id.into());
        self
    }

    pub fn exclude_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.exclude_channel_ids.insert(channel_id.into());
        self
    }

    pub fn published_after(mut self, at: DateTime<Utc>) -> Self {
        self.published_after = Some(at);
        self
    }

    pub fn published_before(mut self, at: DateTime<Utc>) -> Self {
        self.published_before = Some(at);
        self
    }

    /// Tighten the lower date bound to `cutoff` unless an existing bound is later.
    pub fn with_cutoff(mut self, cutoff: Option<DateTime<Utc>>) -> Self {
        if let Some(cutoff) = cutoff {
            self.published_after = Some(match self.published_after {
                Some(existing) if existing > cutoff => existing,
                _ => cutoff,
            });
        }
        self
    }

    /// Reject nonsensical criteria before any video is looked at.
    pub fn validate(&self) -> Result<(), OutlierError> {
        check_threshold("min_view_to_subscriber_ratio", self.min_view_to_subscriber_ratio)?;
        check_threshold("min_outlier_score", self.min_outlier_score)?;

        check_entries("include_title_keywords", &self.include_title_keywords)?;
        check_entries("exclude_title_keywords", &self.exclude_title_keywords)?;
        check_entries("include_channel_ids", &self.include_channel_ids)?;
        check_entries("exclude_channel_ids", &self.exclude_channel_ids)?;

        if let Some(id) = self
            .include_channel_ids
            .intersection(&self.exclude_channel_ids)
            .next()
        {
            return Err(OutlierError::invalid(format!(
                "channel {} is both included and excluded",
                id
            )));
        }

        if let (Some(after), Some(before)) = (self.published_after, self.published_before) {
            if after > before {
                return Err(OutlierError::invalid(format!(
                    "published_after ({}) is later than published_before ({})",
                    after.to_rfc3339(),
                    before.to_rfc3339()
                )));
            }
        }

        Ok(())
    }
}

fn check_threshold(name: &str, value: Option<f64>) -> Result<(), OutlierError> {
    match value {
        Some(v) if !v.is_finite() => Err(OutlierError::invalid(format!(
            "{} must be a finite number, got {}",
            name, v
        ))),
        Some(v) if v < 0.0 => Err(OutlierError::invalid(format!(
            "{} must be >= 0, got {}",
            name, v
        ))),
        _ => Ok(()),
    }
}

fn check_entries(name: &str, entries: &BTreeSet<String>) -> Result<(), OutlierError> {
    if entries.iter().any(|e| e.trim().is_empty()) {
        return Err(OutlierError::invalid(format!("{} contains a blank entry", name)));
    }
    Ok(())
}

/// The individual criterion that rejected a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    MinViewCount,
    MinSubscriberCount,
    MinViewToSubscriberRatio,
    MinOutlierScore,
    ContentKind,
    IncludeTitleKeywords,
    ExcludeTitleKeywords,
    IncludeChannelIds,
    ExcludeChannelIds,
    PublishedAfter,
    PublishedBefore,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::MinViewCount => "min_view_count",
            Criterion::MinSubscriberCount => "min_subscriber_count",
            Criterion::MinViewToSubscriberRatio => "min_view_to_subscriber_ratio",
            Criterion::MinOutlierScore => "min_outlier_score",
            Criterion::ContentKind => "content_kind",
            Criterion::IncludeTitleKeywords => "include_title_keywords",
            Criterion::ExcludeTitleKeywords => "exclude_title_keywords",
            Criterion::IncludeChannelIds => "include_channel_ids",
            Criterion::ExcludeChannelIds => "exclude_channel_ids",
            Criterion::PublishedAfter => "published_after",
            Criterion::PublishedBefore => "published_before",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_none_is_empty() {
        assert!(FilterCriteria::none().is_empty());
        assert!(!FilterCriteria::none().with_min_views(1).is_empty());
        assert!(FilterCriteria::none().validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_thresholds() {
        let err = FilterCriteria::none().with_min_outlier_score(-1.0).validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("min_outlier_score"));

        let err = FilterCriteria::none().with_min_ratio(-0.5).validate().unwrap_err();
        assert!(err.to_string().contains("min_view_to_subscriber_ratio"));
    }

    #[test]
    fn test_rejects_nan_threshold() {
        assert!(FilterCriteria::none()
            .with_min_outlier_score(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_rejects_blank_keyword() {
        let err = FilterCriteria::none().include_keyword("  ").validate().unwrap_err();
        assert!(err.to_string().contains("include_title_keywords"));
    }

    #[test]
    fn test_rejects_channel_in_both_sets() {
        let err = FilterCriteria::none()
            .include_channel("UC1")
            .exclude_channel("UC1")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("UC1"));
    }

    #[test]
    fn test_rejects_inverted_date_range() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        assert!(FilterCriteria::none()
            .published_after(late)
            .published_before(early)
            .validate()
            .is_err());
        assert!(FilterCriteria::none()
            .published_after(early)
            .published_before(early)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_with_cutoff_keeps_later_bound() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let c = FilterCriteria::none().published_after(late).with_cutoff(Some(early));
        assert_eq!(c.published_after, Some(late));

        let c = FilterCriteria::none().published_after(early).with_cutoff(Some(late));
        assert_eq!(c.published_after, Some(late));

        let c = FilterCriteria::none().with_cutoff(None);
        assert!(c.is_empty());
    }

    #[test]
    fn test_yaml_round_trip_of_partial_criteria() {
        let yaml = "min_view_count: 100000\n\
                    min_outlier_score: 5.0\n\
                    content_kind: short\n\
                    exclude_title_keywords: [reaction]\n";
        let c: FilterCriteria = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(c.min_view_count, Some(100_000));
        assert_eq!(c.min_outlier_score, Some(5.0));
        assert_eq!(c.content_kind, Some(ContentKind::Short));
        assert!(c.exclude_title_keywords.contains("reaction"));
        assert!(c.min_view_to_subscriber_ratio.is_none());
    }

    #[test]
    fn test_negative_min_views_fails_to_parse() {
        let parsed: Result<FilterCriteria, _> = serde_yaml::from_str("min_view_count: -5\n");
        assert!(parsed.is_err());
    }
}
