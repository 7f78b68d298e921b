//! JVM and host resource charts.
//!
//! GC metric names vary between collectors, so the GC chart probes an
//! ordered list of candidate key sets and then falls back to searching the
//! snapshot for GC-looking keys before giving up.

use super::trend::{trends, TrendChart};
use super::ViewState;
use nf_common::{MetricSnapshot, TimeRange};
use nf_config::analytics::SystemConfig;
use serde::Serialize;

/// Which probe produced the GC chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GcSource {
    Candidate { index: usize },
    Search,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GcView {
    pub source: GcSource,
    pub chart: TrendChart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemView {
    pub gc: ViewState<GcView>,
    pub cpu: ViewState<TrendChart>,
    pub threads: ViewState<TrendChart>,
    pub memory: ViewState<TrendChart>,
}

pub fn system_view(
    snapshot: &MetricSnapshot,
    config: &SystemConfig,
    range: TimeRange,
    now_ms: i64,
) -> SystemView {
    SystemView {
        gc: gc_view(snapshot, config, range, now_ms),
        cpu: chart(snapshot, &config.cpu_metrics, range, now_ms, "cpu"),
        threads: chart(snapshot, &config.thread_metrics, range, now_ms, "thread"),
        memory: chart(snapshot, &config.memory_metrics, range, now_ms, "memory"),
    }
}

fn chart(
    snapshot: &MetricSnapshot,
    keys: &[String],
    range: TimeRange,
    now_ms: i64,
    what: &str,
) -> ViewState<TrendChart> {
    let chart = TrendChart::new(trends(snapshot, keys, range, now_ms));
    if chart.is_empty() {
        return ViewState::no_data(format!("no {} data in range", what));
    }
    ViewState::Ready(chart)
}

/// GC chart from the first candidate set with any retained data, else from
/// keys matching the search tokens.
pub fn gc_view(
    snapshot: &MetricSnapshot,
    config: &SystemConfig,
    range: TimeRange,
    now_ms: i64,
) -> ViewState<GcView> {
    for (index, keys) in config.gc_candidates.iter().enumerate() {
        if keys.iter().any(|k| !snapshot.series(k).is_empty()) {
            return ViewState::Ready(GcView {
                source: GcSource::Candidate { index },
                chart: TrendChart::new(trends(snapshot, keys, range, now_ms)),
            });
        }
    }

    let found: Vec<&str> = snapshot
        .keys()
        .filter(|key| {
            let lower = key.to_lowercase();
            config
                .gc_search_tokens
                .iter()
                .any(|t| lower.contains(&t.to_lowercase()))
        })
        .take(config.gc_search_limit)
        .collect();

    if let Some(primary) = found.first() {
        let chart = TrendChart::new(trends(snapshot, &found, range, now_ms));
        if chart.trends.first().is_some_and(|t| !t.is_empty()) {
            tracing::debug!(primary = %primary, "using GC keys found by search");
            return ViewState::Ready(GcView {
                source: GcSource::Search,
                chart,
            });
        }
    }

    ViewState::no_data("No GC Data Available")
}
