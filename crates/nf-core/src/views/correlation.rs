//! On-demand correlation between two metrics.

use super::ViewState;
use crate::correlate::correlate;
use nf_common::labels::metric_label;
use nf_common::MetricSnapshot;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationView {
    pub x: String,
    pub y: String,
    pub title: String,
    pub tolerance_ms: i64,
    pub pair_count: usize,
    pub coefficient: Option<f64>,
    pub strength: &'static str,
    pub pairs: Vec<(f64, f64)>,
}

/// Correlate the full retained history of `x` and `y`.
pub fn correlation_view(
    snapshot: &MetricSnapshot,
    x: &str,
    y: &str,
    tolerance_ms: i64,
) -> ViewState<CorrelationView> {
    let xs = snapshot.series(x);
    let ys = snapshot.series(y);
    if xs.is_empty() || ys.is_empty() {
        let missing = if xs.is_empty() { x } else { y };
        return ViewState::no_data(format!("no samples for {}", missing));
    }

    let result = correlate(xs, ys, tolerance_ms);
    if result.pairs.is_empty() {
        return ViewState::no_data(format!(
            "no samples of {} and {} within {} ms of each other",
            x, y, tolerance_ms
        ));
    }

    ViewState::Ready(CorrelationView {
        x: x.to_string(),
        y: y.to_string(),
        title: format!("Correlation: {} vs {}", metric_label(x), metric_label(y)),
        tolerance_ms,
        pair_count: result.pair_count(),
        coefficient: result.coefficient,
        strength: result.strength(),
        pairs: result.pairs,
    })
}
