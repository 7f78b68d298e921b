//! Lag-spike frequency across rolling windows.

use super::ViewState;
use crate::rate::{derive_spike_events, window_counts, WindowCount};
use nf_common::{MetricSnapshot, Window};
use nf_config::analytics::LagSpikeConfig;
use serde::Serialize;

/// Where the spike events came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpikeSource {
    /// Every point of an event series is one spike.
    EventSeries { metric: String },
    /// Samples of a latency metric above a threshold.
    Derived { metric: String, threshold_ms: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagSpikeView {
    pub source: SpikeSource,
    pub total_events: usize,
    pub windows: Vec<WindowCount>,
}

/// Count spikes per window, probing the configured sources in order.
pub fn lag_spike_view(
    snapshot: &MetricSnapshot,
    config: &LagSpikeConfig,
    windows: &[Window],
    now_ms: i64,
) -> ViewState<LagSpikeView> {
    let explicit = config
        .event_metrics
        .iter()
        .find(|key| !snapshot.series(key).is_empty());

    let (source, events) = if let Some(key) = explicit {
        (
            SpikeSource::EventSeries {
                metric: key.clone(),
            },
            snapshot.series(key).timestamps(),
        )
    } else if let Some(key) = config
        .derive_from_metric
        .as_ref()
        .filter(|key| !snapshot.series(key).is_empty())
    {
        tracing::debug!(metric = %key, "no spike event series, deriving from samples");
        (
            SpikeSource::Derived {
                metric: key.clone(),
                threshold_ms: config.spike_threshold_ms,
            },
            derive_spike_events(snapshot.series(key), config.spike_threshold_ms),
        )
    } else {
        return ViewState::no_data("no lag spike or tick time data");
    };

    ViewState::Ready(LagSpikeView {
        source,
        total_events: events.len(),
        windows: window_counts(&events, windows, now_ms),
    })
}
