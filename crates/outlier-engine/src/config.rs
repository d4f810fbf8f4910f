//! Engine configuration
//!
//! One record per invocation. The two presets mirror the two ways the tool
//! is used: scoring the uploads of a saved list of channels, and researching
//! a keyword-search candidate pool.

use outlier_core::{BaselinePolicy, OutlierError};
use outlier_filter::{DatePreset, FilterCriteria, SortOrder};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LOOKBACK_SAMPLE_SIZE: usize = 50;
pub const DEFAULT_PER_CHANNEL_VIDEO_CAP: usize = 25;
pub const DEFAULT_MAX_CHANNELS_PER_FETCH: usize = 10;
pub const DEFAULT_SEARCH_RESULTS_PER_KEYWORD: usize = 10;
pub const DEFAULT_RESEARCH_RESULT_CAP: usize = 50;

/// How `result_cap` trims the filtered set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapStrategy {
    /// Keep the first `result_cap` videos after ranking
    #[default]
    Top,
    /// Draw `result_cap` videos uniformly at random before ranking
    RandomSample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Profile name (e.g., "saved_channels@1.0")
    pub name: String,

    // === Provider fetch sizes ===

    /// Most recent uploads averaged into a channel baseline
    #[serde(default = "default_lookback")]
    pub lookback_sample_size: usize,

    /// Uploads per saved channel considered as candidates
    #[serde(default = "default_video_cap")]
    pub per_channel_video_cap: usize,

    /// Saved channels processed per run; extra inputs are dropped
    #[serde(default = "default_max_channels")]
    pub max_channels_per_fetch: usize,

    /// Search hits requested per research keyword
    #[serde(default = "default_search_results")]
    pub search_results_per_keyword: usize,

    // === Scoring ===

    /// Fallback for channels with an empty lookback sample. Required.
    pub baseline_policy: BaselinePolicy,

    // === Selection ===

    #[serde(default)]
    pub criteria: FilterCriteria,

    #[serde(default)]
    pub date_preset: DatePreset,

    #[serde(default)]
    pub order: SortOrder,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_cap: Option<usize>,

    #[serde(default)]
    pub cap_strategy: CapStrategy,
}

fn default_lookback() -> usize {
    DEFAULT_LOOKBACK_SAMPLE_SIZE
}

fn default_video_cap() -> usize {
    DEFAULT_PER_CHANNEL_VIDEO_CAP
}

fn default_max_channels() -> usize {
    DEFAULT_MAX_CHANNELS_PER_FETCH
}

fn default_search_results() -> usize {
    DEFAULT_SEARCH_RESULTS_PER_KEYWORD
}

impl EngineConfig {
    /// Score every fetched upload of a handful of saved channels.
    pub fn saved_channels() -> Self {
        Self {
            name: "saved_channels@1.0".to_string(),
            lookback_sample_size: DEFAULT_LOOKBACK_SAMPLE_SIZE,
            per_channel_video_cap: DEFAULT_PER_CHANNEL_VIDEO_CAP,
            max_channels_per_fetch: DEFAULT_MAX_CHANNELS_PER_FETCH,
            search_results_per_keyword: DEFAULT_SEARCH_RESULTS_PER_KEYWORD,
            baseline_policy: BaselinePolicy::LifetimeAverage,
            criteria: FilterCriteria::none(),
            date_preset: DatePreset::AllTime,
            order: SortOrder::Random,
            result_cap: None,
            cap_strategy: CapStrategy::Top,
        }
    }

    /// Random sample of strong outliers from a keyword candidate pool.
    pub fn research() -> Self {
        Self {
            name: "research@1.0".to_string(),
            criteria: FilterCriteria::none()
                .with_min_views(100_000)
                .with_min_outlier_score(5.0),
            result_cap: Some(DEFAULT_RESEARCH_RESULT_CAP),
            cap_strategy: CapStrategy::RandomSample,
            ..Self::saved_channels()
        }
    }

    /// Preset by workflow name, falling back to saved channels.
    pub fn for_workflow(workflow: &str) -> Self {
        match workflow {
            "research" => Self::research(),
            _ => Self::saved_channels(),
        }
    }

    /// Parse and validate a YAML profile.
    ///
    /// Out-of-range values the types cannot hold (a negative view count,
    /// an unknown sort order) are configuration errors too.
    pub fn from_yaml(yaml: &str) -> Result<Self, OutlierError> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| OutlierError::invalid(format!("profile: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, OutlierError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| OutlierError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&text)
    }

    pub fn to_yaml(&self) -> Result<String, OutlierError> {
        serde_yaml::to_string(self).map_err(|e| OutlierError::Parse(e.to_string()))
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_baseline_policy(mut self, policy: BaselinePolicy) -> Self {
        self.baseline_policy = policy;
        self
    }

    pub fn with_lookback(mut self, sample_size: usize) -> Self {
        self.lookback_sample_size = sample_size;
        self
    }

    pub fn with_video_cap(mut self, cap: usize) -> Self {
        self.per_channel_video_cap = cap;
        self
    }

    pub fn with_date_preset(mut self, preset: DatePreset) -> Self {
        self.date_preset = preset;
        self
    }

    pub fn with_result_cap(mut self, cap: usize, strategy: CapStrategy) -> Self {
        self.result_cap = Some(cap);
        self.cap_strategy = strategy;
        self
    }

    pub fn uncapped(mut self) -> Self {
        self.result_cap = None;
        self
    }

    pub fn validate(&self) -> Result<(), OutlierError> {
        let positive = [
            ("lookback_sample_size", self.lookback_sample_size),
            ("per_channel_video_cap", self.per_channel_video_cap),
            ("max_channels_per_fetch", self.max_channels_per_fetch),
            ("search_results_per_keyword", self.search_results_per_keyword),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(OutlierError::invalid(format!("{} must be at least 1", field)));
            }
        }

        if self.result_cap == Some(0) {
            return Err(OutlierError::invalid("result_cap must be at least 1 when set"));
        }

        self.criteria
            .validate()
            .map_err(|e| match e {
                OutlierError::InvalidConfiguration(msg) => {
                    OutlierError::invalid(format!("{}: {}", self.name, msg))
                }
                other => other,
            })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::saved_channels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(EngineConfig::saved_channels().validate().is_ok());
        assert!(EngineConfig::research().validate().is_ok());
    }

    #[test]
    fn test_research_preset() {
        let config = EngineConfig::for_workflow("research");
        assert_eq!(config.result_cap, Some(50));
        assert_eq!(config.cap_strategy, CapStrategy::RandomSample);
        assert_eq!(config.criteria.min_view_count, Some(100_000));
        assert_eq!(config.criteria.min_outlier_score, Some(5.0));
        assert_eq!(config.baseline_policy, BaselinePolicy::LifetimeAverage);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let err = EngineConfig::saved_channels().with_lookback(0).validate().unwrap_err();
        assert!(err.to_string().contains("lookback_sample_size"));

        let err = EngineConfig::saved_channels()
            .with_result_cap(0, CapStrategy::Top)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("result_cap"));
    }

    #[test]
    fn test_invalid_criteria_rejected_with_profile_name() {
        let config = EngineConfig::research()
            .with_criteria(FilterCriteria::none().with_min_outlier_score(-2.0));
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().starts_with("CONFIG/research@1.0"));
    }

    #[test]
    fn test_yaml_requires_baseline_policy() {
        let err = EngineConfig::from_yaml("name: custom\n").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("baseline_policy"));
    }

    #[test]
    fn test_yaml_defaults() {
        let config = EngineConfig::from_yaml("name: custom\nbaseline_policy: sentinel\n").unwrap();
        assert_eq!(config.lookback_sample_size, DEFAULT_LOOKBACK_SAMPLE_SIZE);
        assert_eq!(config.baseline_policy, BaselinePolicy::Sentinel);
        assert_eq!(config.order, SortOrder::Random);
        assert!(config.criteria.is_empty());
        assert_eq!(config.result_cap, None);
    }

    #[test]
    fn test_yaml_negative_min_views_is_configuration_error() {
        let yaml = "name: custom\nbaseline_policy: sentinel\ncriteria:\n  min_view_count: -10\n";
        let err = EngineConfig::from_yaml(yaml).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = EngineConfig::research().with_date_preset(DatePreset::Last90Days);
        let parsed = EngineConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
