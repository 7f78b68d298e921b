//! Timestamp alignment and correlation between two series.
//!
//! Known limitation: each X point pairs with the *first* Y point (in Y's
//! order) whose timestamp is within tolerance, not the nearest one. With
//! dense Y sampling this can pick a point up to `tolerance_ms` away while a
//! closer one exists.

use nf_common::MetricSeries;
use nf_math::pearson;
use serde::Serialize;

/// Default pairing tolerance.
pub const DEFAULT_TOLERANCE_MS: i64 = 1000;

/// Aligned pairs and their Pearson coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub pairs: Vec<(f64, f64)>,
    /// `None` for fewer than two pairs or zero variance on either side.
    pub coefficient: Option<f64>,
}

impl CorrelationResult {
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Coarse description of the coefficient's magnitude.
    pub fn strength(&self) -> &'static str {
        match self.coefficient.map(f64::abs) {
            None => "undefined",
            Some(r) if r >= 0.7 => "strong",
            Some(r) if r >= 0.4 => "moderate",
            Some(r) if r >= 0.2 => "weak",
            Some(_) => "negligible",
        }
    }
}

/// Pair each X point with the first Y point where `|Δt| < tolerance_ms`.
///
/// X points without a partner are dropped. A Y point may be reused.
pub fn align(x: &MetricSeries, y: &MetricSeries, tolerance_ms: i64) -> Vec<(f64, f64)> {
    // Non-positive tolerances pair nothing.
    let tolerance = u64::try_from(tolerance_ms).unwrap_or(0);
    x.iter()
        .filter_map(|px| {
            y.iter()
                .find(|py| px.timestamp.abs_diff(py.timestamp) < tolerance)
                .map(|py| (px.value, py.value))
        })
        .collect()
}

/// Align `x` and `y` and compute Pearson's r over the pairs.
pub fn correlate(x: &MetricSeries, y: &MetricSeries, tolerance_ms: i64) -> CorrelationResult {
    let pairs = align(x, y, tolerance_ms);
    let coefficient = pearson(&pairs);
    CorrelationResult { pairs, coefficient }
}
