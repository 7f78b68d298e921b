//! Analytical views over a metric snapshot.
//!
//! Every view is recomputed from scratch on each pass and reports either
//! ready data or an explicit no-data state with a reason. A view with nothing
//! to show never fails the pass.

pub mod chunks;
pub mod correlation;
pub mod distribution;
pub mod entities;
pub mod lag;
pub mod overview;
pub mod system;
pub mod trend;

use nf_common::{CategoryClassifier, MetricSnapshot, TimeRange, Window};
use nf_config::AnalyticsConfig;
use nf_math::Bucket;
use serde::Serialize;

pub use chunks::ChunksView;
pub use correlation::CorrelationView;
pub use distribution::DistributionView;
pub use entities::EntitiesView;
pub use lag::LagSpikeView;
pub use overview::OverviewView;
pub use system::SystemView;
pub use trend::{Trend, TrendChart, TrendPoint};

/// Outcome of one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Ready(T),
    NoData { reason: String },
}

impl<T> ViewState<T> {
    pub fn no_data(reason: impl Into<String>) -> Self {
        ViewState::NoData {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            ViewState::NoData { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ViewState::Ready(_) => None,
            ViewState::NoData { reason } => Some(reason),
        }
    }
}

/// User-selected parameters for a pass. Unrecognized choices fall back to
/// configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisParams {
    pub time_range: TimeRange,
    pub performance_metric: Option<String>,
    pub population_metric: Option<String>,
    /// Metric pair for the correlation view; the configured default when unset.
    pub correlation: Option<(String, String)>,
}

impl AnalysisParams {
    pub fn with_time_range_label(mut self, label: &str) -> Self {
        self.time_range = TimeRange::from_label(label);
        self
    }

    pub fn with_correlation(mut self, x: &str, y: &str) -> Self {
        self.correlation = Some((x.to_string(), y.to_string()));
        self
    }
}

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub time_range: TimeRange,
    pub now_ms: i64,
    pub series_count: usize,
    pub overview: OverviewView,
    pub distribution: ViewState<DistributionView>,
    pub lag_spikes: ViewState<LagSpikeView>,
    pub correlation: ViewState<CorrelationView>,
    pub entities: EntitiesView,
    pub chunks: ChunksView,
    pub system: SystemView,
}

impl AnalyticsReport {
    fn view_reasons(&self) -> Vec<(&'static str, Option<&str>)> {
        let headlines = if self.overview.headlines.iter().all(|h| h.value.is_none()) {
            Some("no headline metrics present")
        } else {
            None
        };
        vec![
            ("overview.headlines", headlines),
            ("overview.performance", self.overview.performance.reason()),
            ("overview.population", self.overview.population.reason()),
            ("distribution", self.distribution.reason()),
            ("lag_spikes", self.lag_spikes.reason()),
            ("correlation", self.correlation.reason()),
            ("entities.categories", self.entities.categories.reason()),
            ("entities.types", self.entities.types.reason()),
            ("entities.hotspots", self.entities.hotspots.reason()),
            ("chunks.by_dimension", self.chunks.by_dimension.reason()),
            ("chunks.active", self.chunks.active.reason()),
            ("chunks.block_entities", self.chunks.block_entities.reason()),
            ("chunks.rates", self.chunks.rates.reason()),
            ("system.gc", self.system.gc.reason()),
            ("system.cpu", self.system.cpu.reason()),
            ("system.threads", self.system.threads.reason()),
            ("system.memory", self.system.memory.reason()),
        ]
    }

    /// Names of views that had nothing to show, with reasons.
    pub fn empty_views(&self) -> Vec<(&'static str, &str)> {
        self.view_reasons()
            .into_iter()
            .filter_map(|(name, reason)| reason.map(|r| (name, r)))
            .collect()
    }

    /// Number of views in a report, with or without data.
    pub fn view_count(&self) -> usize {
        self.view_reasons().len()
    }

    /// True when not a single view has data.
    pub fn is_empty(&self) -> bool {
        self.view_reasons().iter().all(|(_, reason)| reason.is_some())
    }
}

/// Composes the individual views into a report.
///
/// Holds only configuration-derived state; the snapshot is passed to each
/// call so an analyzer can be reused across refreshes.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyticsConfig,
    classifier: CategoryClassifier,
    templates: Vec<Bucket>,
    windows: Vec<Window>,
}

impl Analyzer {
    pub fn new(config: AnalyticsConfig) -> Self {
        let classifier = match &config.entities.rules {
            Some(rules) => CategoryClassifier::with_rules(rules.clone()),
            None => CategoryClassifier::new(),
        };
        let templates = config.bucket_templates();
        let windows = config.lag_windows();
        Self {
            config,
            classifier,
            templates,
            windows,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    /// Run one full pass.
    pub fn analyze(
        &self,
        snapshot: &MetricSnapshot,
        params: &AnalysisParams,
        now_ms: i64,
    ) -> AnalyticsReport {
        let range = params.time_range;
        tracing::debug!(
            series = snapshot.len(),
            range = %range,
            now_ms,
            "analysis pass started"
        );

        let report = AnalyticsReport {
            time_range: range,
            now_ms,
            series_count: snapshot.len(),
            overview: overview::overview_view(
                snapshot,
                &self.config.overview,
                params.performance_metric.as_deref(),
                params.population_metric.as_deref(),
                range,
                now_ms,
            ),
            distribution: distribution::distribution_view(
                snapshot,
                &self.config.distribution.metric,
                &self.templates,
            ),
            lag_spikes: lag::lag_spike_view(snapshot, &self.config.lag_spikes, &self.windows, now_ms),
            correlation: self.correlate(snapshot, params),
            entities: entities::entities_view(snapshot, &self.classifier, &self.config.entities),
            chunks: chunks::chunks_view(snapshot, &self.config.chunks, range, now_ms),
            system: system::system_view(snapshot, &self.config.system, range, now_ms),
        };

        for (view, reason) in report.empty_views() {
            tracing::trace!(view, reason, "view has no data");
        }
        tracing::debug!(
            empty_views = report.empty_views().len(),
            "analysis pass finished"
        );
        report
    }

    /// Correlation view for the selected pair, or the configured default pair.
    pub fn correlate(
        &self,
        snapshot: &MetricSnapshot,
        params: &AnalysisParams,
    ) -> ViewState<CorrelationView> {
        let (x, y) = match &params.correlation {
            Some((x, y)) => (x.as_str(), y.as_str()),
            None => (
                self.config.correlation.default_x.as_str(),
                self.config.correlation.default_y.as_str(),
            ),
        };
        correlation::correlation_view(snapshot, x, y, self.config.correlation.tolerance_ms)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_state_serialization() {
        let ready: ViewState<u32> = ViewState::Ready(3);
        let json = serde_json::to_value(&ready).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["data"], 3);

        let empty: ViewState<u32> = ViewState::no_data("nothing");
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["status"], "no_data");
        assert_eq!(json["data"]["reason"], "nothing");
        assert_eq!(empty.reason(), Some("nothing"));
    }

    #[test]
    fn test_empty_snapshot_report() {
        let report = Analyzer::default().analyze(&MetricSnapshot::new(), &AnalysisParams::default(), 0);
        assert!(report.is_empty());
        assert_eq!(report.series_count, 0);
    }

    #[test]
    fn test_params_label_fallback() {
        let params = AnalysisParams::default().with_time_range_label("3d");
        assert_eq!(params.time_range, TimeRange::OneHour);
    }
}
