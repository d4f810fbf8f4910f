//! Relative publish-date windows

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DatePreset {
    #[default]
    #[serde(rename = "all_time")]
    AllTime,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "last_90_days")]
    Last90Days,
    #[serde(rename = "last_180_days")]
    Last180Days,
    #[serde(rename = "last_365_days")]
    Last365Days,
}

impl DatePreset {
    pub fn days(&self) -> Option<i64> {
        match self {
            DatePreset::AllTime => None,
            DatePreset::Last30Days => Some(30),
            DatePreset::Last90Days => Some(90),
            DatePreset::Last180Days => Some(180),
            DatePreset::Last365Days => Some(365),
        }
    }

    /// Earliest publish time inside the window ending at `now`; `None` for
    /// all time, or when the window starts before the earliest representable
    /// instant.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().and_then(|days| now.checked_sub_signed(Duration::days(days)))
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.days() {
            None => write!(f, "All Time"),
            Some(days) => write!(f, "Last {} Days", days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cutoffs() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 12, 0, 0).unwrap();
        assert_eq!(DatePreset::AllTime.cutoff(now), None);
        assert_eq!(
            DatePreset::Last30Days.cutoff(now),
            Some(Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(
            DatePreset::Last365Days.cutoff(now),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_cutoff_near_min_time_is_unbounded() {
        let now = DateTime::<Utc>::MIN_UTC;
        assert_eq!(DatePreset::Last30Days.cutoff(now), None);
        assert_eq!(DatePreset::Last365Days.cutoff(now + Duration::days(100)), None);
        assert_eq!(DatePreset::Last30Days.cutoff(now + Duration::days(30)), Some(now));
    }

    #[test]
    fn test_labels_and_serde() {
        assert_eq!(DatePreset::Last90Days.to_string(), "Last 90 Days");
        assert_eq!(DatePreset::default().to_string(), "All Time");
        let preset: DatePreset = serde_json::from_str("\"last_180_days\"").unwrap();
        assert_eq!(preset, DatePreset::Last180Days);
    }
}
