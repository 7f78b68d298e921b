//! Time-filtered series shaped for charting.

use crate::series::filter_series;
use nf_common::labels::{clock_label, metric_label};
use nf_common::{MetricSnapshot, TimeRange};
use serde::Serialize;

/// One charted sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: i64,
    /// `HH:MM:SS` (UTC).
    pub clock: String,
    pub value: f64,
}

/// A named, time-filtered series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub key: String,
    pub label: String,
    pub points: Vec<TrendPoint>,
}

impl Trend {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.value)
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}

/// Several trends drawn on one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub trends: Vec<Trend>,
    /// Suggested y-axis maximum, when the chart has one.
    pub y_max: Option<f64>,
}

impl TrendChart {
    pub fn new(trends: Vec<Trend>) -> Self {
        Self { trends, y_max: None }
    }

    pub fn with_y_max(mut self, y_max: Option<f64>) -> Self {
        self.y_max = y_max;
        self
    }

    /// True when every trend is empty.
    pub fn is_empty(&self) -> bool {
        self.trends.iter().all(Trend::is_empty)
    }
}

/// Build the trend for `key` over the trailing window.
pub fn trend(snapshot: &MetricSnapshot, key: &str, range: TimeRange, now_ms: i64) -> Trend {
    let points = filter_series(snapshot.series(key), range, now_ms)
        .iter()
        .map(|p| TrendPoint {
            timestamp: p.timestamp,
            clock: clock_label(p.timestamp),
            value: p.value,
        })
        .collect();

    Trend {
        key: key.to_string(),
        label: metric_label(key),
        points,
    }
}

/// Trends for each key, in the order given.
pub fn trends<S: AsRef<str>>(
    snapshot: &MetricSnapshot,
    keys: &[S],
    range: TimeRange,
    now_ms: i64,
) -> Vec<Trend> {
    keys.iter()
        .map(|k| trend(snapshot, k.as_ref(), range, now_ms))
        .collect()
}
