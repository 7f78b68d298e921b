//! Tick-time histogram.

use super::ViewState;
use nf_common::MetricSnapshot;
use nf_math::{bucket_values, summarize, total_count, Bucket, Summary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionView {
    pub metric: String,
    pub buckets: Vec<Bucket>,
    pub total: u64,
    pub summary: Summary,
}

/// Bucket every retained sample of `metric`.
///
/// The collector already bounds how much history it keeps, so no time range
/// is applied here.
pub fn distribution_view(
    snapshot: &MetricSnapshot,
    metric: &str,
    templates: &[Bucket],
) -> ViewState<DistributionView> {
    let values = snapshot.series(metric).values();
    let Some(summary) = summarize(&values) else {
        return ViewState::no_data(format!("no samples for {}", metric));
    };

    let buckets = bucket_values(&values, templates);
    ViewState::Ready(DistributionView {
        metric: metric.to_string(),
        total: total_count(&buckets),
        buckets,
        summary,
    })
}
