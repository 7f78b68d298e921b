//! Trailing time-window slicing.

use nf_common::{MetricPoint, MetricSeries, TimeRange};

/// Keep the points of `series` inside the trailing window that ends at `now_ms`.
///
/// A point survives when `timestamp >= now_ms - lookback`. Order is preserved
/// and points stamped after `now_ms` are kept.
pub fn filter_series(series: &MetricSeries, range: TimeRange, now_ms: i64) -> MetricSeries {
    let cutoff = now_ms.saturating_sub(range.lookback_ms());
    series
        .iter()
        .copied()
        .filter(|p| p.timestamp >= cutoff)
        .collect()
}

/// Same as [`filter_series`] but takes the range as a raw label.
///
/// Unknown labels fall back to one hour.
pub fn filter_series_by_label(series: &MetricSeries, label: &str, now_ms: i64) -> MetricSeries {
    filter_series(series, TimeRange::from_label(label), now_ms)
}

/// Values of the filtered points, for callers that only chart magnitudes.
pub fn windowed_values(series: &MetricSeries, range: TimeRange, now_ms: i64) -> Vec<f64> {
    filter_series(series, range, now_ms)
        .iter()
        .map(|p: &MetricPoint| p.value)
        .collect()
}
