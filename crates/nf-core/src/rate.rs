//! Rolling-window event counting.
//!
//! Windows are cumulative: an event one minute old counts toward the
//! one-minute window and every wider one.

use nf_common::{MetricSeries, Window};
use serde::Serialize;

/// Count of events inside one trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowCount {
    pub label: String,
    pub duration_ms: i64,
    pub count: u64,
}

/// Count events with `now_ms - t <= duration_ms` for each window.
///
/// Output is aligned with `windows`. Events stamped after `now_ms` have a
/// negative age and count toward every window.
pub fn aggregate_windows(event_timestamps: &[i64], windows: &[Window], now_ms: i64) -> Vec<u64> {
    windows
        .iter()
        .map(|w| {
            event_timestamps
                .iter()
                .filter(|t| now_ms.saturating_sub(**t) <= w.duration_ms)
                .count() as u64
        })
        .collect()
}

/// [`aggregate_windows`] with labels attached.
pub fn window_counts(event_timestamps: &[i64], windows: &[Window], now_ms: i64) -> Vec<WindowCount> {
    aggregate_windows(event_timestamps, windows, now_ms)
        .into_iter()
        .zip(windows)
        .map(|(count, w)| WindowCount {
            label: w.label.clone(),
            duration_ms: w.duration_ms,
            count,
        })
        .collect()
}

/// Timestamps of samples whose value exceeds `threshold`.
///
/// Used when the collector publishes raw tick times but no spike series.
pub fn derive_spike_events(samples: &MetricSeries, threshold: f64) -> Vec<i64> {
    samples
        .iter()
        .filter(|p| p.value > threshold)
        .map(|p| p.timestamp)
        .collect()
}
