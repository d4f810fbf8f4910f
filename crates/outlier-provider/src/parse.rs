//! Parsing of user input and upstream fields
//!
//! - channel references pasted as raw IDs or channel URLs
//! - comma-separated lists typed into a form
//! - ISO-8601 durations as reported for videos (`PT4M13S`)

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `https://www.youtube.com/channel/<id>` with optional scheme and subdomain
    static ref CHANNEL_URL: Regex =
        Regex::new(r"^(?:https?://)?(?:[\w-]+\.)*youtube\.com/channel/([\w-]+)").unwrap();

    /// `P[nW][nD][T[nH][nM][n[.n]S]]`
    static ref ISO_DURATION: Regex = Regex::new(
        r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$"
    )
    .unwrap();
}

/// Channel ID from a raw ID or a channel URL.
///
/// Anything that is not a `/channel/<id>` URL is returned trimmed but
/// otherwise untouched; blank input yields `None`.
pub fn parse_channel_id(input: &str) -> Option<String> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }
    match CHANNEL_URL.captures(value) {
        Some(caps) => caps.get(1).map(|m| m.as_str().to_string()),
        None => Some(value.to_string()),
    }
}

/// Split comma-separated input, trimming entries and dropping blanks.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole seconds of an ISO-8601 duration, `None` if it does not parse.
pub fn parse_iso8601_duration(input: &str) -> Option<u64> {
    let value = input.trim();
    if value == "P" || value.ends_with('T') {
        return None;
    }
    let caps = ISO_DURATION.captures(value)?;
    let part = |i: usize| -> Option<u64> {
        caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let weeks = part(1)?;
    let days = part(2)?;
    let hours = part(3)?;
    let minutes = part(4)?;
    let seconds = part(5)?;

    let total = weeks
        .checked_mul(7 * 24 * 3600)?
        .checked_add(days.checked_mul(24 * 3600)?)?
        .checked_add(hours.checked_mul(3600)?)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?;
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_from_url() {
        assert_eq!(
            parse_channel_id("https://www.youtube.com/channel/UCabc-123_x"),
            Some("UCabc-123_x".to_string())
        );
        assert_eq!(
            parse_channel_id("  youtube.com/channel/UCabc/videos "),
            Some("UCabc".to_string())
        );
    }

    #[test]
    fn test_channel_id_passthrough() {
        assert_eq!(parse_channel_id("UCraw"), Some("UCraw".to_string()));
        assert_eq!(
            parse_channel_id("https://www.youtube.com/@handle"),
            Some("https://www.youtube.com/@handle".to_string())
        );
        assert_eq!(parse_channel_id("   "), None);
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list("I tried, My story,,  Top 10 "),
            vec!["I tried", "My story", "Top 10"]
        );
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn test_durations() {
        assert_eq!(parse_iso8601_duration("PT0S"), Some(0));
        assert_eq!(parse_iso8601_duration("PT59S"), Some(59));
        assert_eq!(parse_iso8601_duration("PT1M"), Some(60));
        assert_eq!(parse_iso8601_duration("PT4M13S"), Some(253));
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723));
        assert_eq!(parse_iso8601_duration("P1DT1S"), Some(86_401));
        assert_eq!(parse_iso8601_duration("P0D"), Some(0));
        assert_eq!(parse_iso8601_duration("PT12.5S"), Some(12));
    }

    #[test]
    fn test_bad_durations() {
        assert_eq!(parse_iso8601_duration(""), None);
        assert_eq!(parse_iso8601_duration("P"), None);
        assert_eq!(parse_iso8601_duration("PT"), None);
        assert_eq!(parse_iso8601_duration("4:13"), None);
        assert_eq!(parse_iso8601_duration("P1DT"), None);
    }
}
