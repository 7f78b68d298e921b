//! User-selectable analysis parameters.

use serde::{Deserialize, Serialize};

const MINUTE_MS: i64 = 60_000;

/// Trailing lookback for time-sliced views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[default]
    #[serde(rename = "1h")]
    OneHour,
}

impl TimeRange {
    pub fn all() -> &'static [TimeRange] {
        &[
            TimeRange::FiveMinutes,
            TimeRange::FifteenMinutes,
            TimeRange::ThirtyMinutes,
            TimeRange::OneHour,
        ]
    }

    /// Parse a label, degrading to the one-hour default when unrecognized.
    pub fn from_label(label: &str) -> Self {
        Self::parse_label(label).unwrap_or_default()
    }

    /// Strict parse, for callers that must reject unknown labels.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim() {
            "5m" => Some(TimeRange::FiveMinutes),
            "15m" => Some(TimeRange::FifteenMinutes),
            "30m" => Some(TimeRange::ThirtyMinutes),
            "1h" => Some(TimeRange::OneHour),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::FiveMinutes => "5m",
            TimeRange::FifteenMinutes => "15m",
            TimeRange::ThirtyMinutes => "30m",
            TimeRange::OneHour => "1h",
        }
    }

    pub fn lookback_ms(&self) -> i64 {
        match self {
            TimeRange::FiveMinutes => 5 * MINUTE_MS,
            TimeRange::FifteenMinutes => 15 * MINUTE_MS,
            TimeRange::ThirtyMinutes => 30 * MINUTE_MS,
            TimeRange::OneHour => 60 * MINUTE_MS,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A named trailing window measured back from "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub label: String,
    pub duration_ms: i64,
}

impl Window {
    pub fn new(label: impl Into<String>, duration_ms: i64) -> Self {
        Self {
            label: label.into(),
            duration_ms,
        }
    }

    pub fn minutes(label: impl Into<String>, minutes: i64) -> Self {
        Self::new(label, minutes * MINUTE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for range in TimeRange::all() {
            assert_eq!(TimeRange::from_label(range.label()), *range);
        }
    }

    #[test]
    fn test_unknown_label_defaults_to_one_hour() {
        assert_eq!(TimeRange::from_label("2d"), TimeRange::OneHour);
        assert_eq!(TimeRange::from_label(""), TimeRange::OneHour);
        assert_eq!(TimeRange::parse_label("2d"), None);
    }

    #[test]
    fn test_lookbacks() {
        assert_eq!(TimeRange::FiveMinutes.lookback_ms(), 300_000);
        assert_eq!(TimeRange::OneHour.lookback_ms(), 3_600_000);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&TimeRange::FifteenMinutes).unwrap();
        assert_eq!(json, "\"15m\"");
        let back: TimeRange = serde_json::from_str("\"30m\"").unwrap();
        assert_eq!(back, TimeRange::ThirtyMinutes);
    }
}
