//! Analytics session: the current snapshot plus user-selected parameters.
//!
//! A session owns the only long-lived state of the engine. Every pass takes
//! `&mut self`, so passes on one session never overlap. [`SessionHandle`]
//! extends that to several threads by serializing access through a mutex.

use crate::views::{AnalysisParams, Analyzer, AnalyticsReport, CorrelationView, ViewState};
use nf_common::{MetricSnapshot, TimeRange};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct AnalyticsSession {
    analyzer: Analyzer,
    snapshot: Arc<MetricSnapshot>,
    params: AnalysisParams,
    last_report: Option<AnalyticsReport>,
    pass_count: u64,
}

impl AnalyticsSession {
    pub fn new(analyzer: Analyzer) -> Self {
        let params = AnalysisParams {
            time_range: analyzer.config().default_time_range(),
            ..AnalysisParams::default()
        };
        Self {
            analyzer,
            snapshot: Arc::new(MetricSnapshot::new()),
            params,
            last_report: None,
            pass_count: 0,
        }
    }

    /// Swap in a new snapshot. Passes already holding the old one keep it.
    pub fn replace_snapshot(&mut self, snapshot: MetricSnapshot) {
        self.snapshot = Arc::new(snapshot);
    }

    pub fn snapshot(&self) -> Arc<MetricSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Select the time range by label; unknown labels select one hour.
    pub fn set_time_range(&mut self, label: &str) -> TimeRange {
        self.params.time_range = TimeRange::from_label(label);
        self.params.time_range
    }

    pub fn set_performance_metric(&mut self, key: &str) {
        self.params.performance_metric = Some(key.to_string());
    }

    pub fn set_population_metric(&mut self, key: &str) {
        self.params.population_metric = Some(key.to_string());
    }

    pub fn set_correlation_pair(&mut self, x: &str, y: &str) {
        self.params.correlation = Some((x.to_string(), y.to_string()));
    }

    /// Run a full pass against the snapshot held at call time.
    pub fn run_pass(&mut self, now_ms: i64) -> AnalyticsReport {
        let snapshot = self.snapshot();
        self.pass_count += 1;
        let report = self.analyzer.analyze(&snapshot, &self.params, now_ms);
        self.last_report = Some(report.clone());
        report
    }

    /// On-demand correlation for one pair, without a full pass.
    pub fn correlate(&mut self, x: &str, y: &str) -> ViewState<CorrelationView> {
        self.set_correlation_pair(x, y);
        let snapshot = self.snapshot();
        self.analyzer.correlate(&snapshot, &self.params)
    }

    pub fn last_report(&self) -> Option<&AnalyticsReport> {
        self.last_report.as_ref()
    }

    pub fn pass_count(&self) -> u64 {
        self.pass_count
    }
}

/// Shareable, serialized access to one session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<AnalyticsSession>>,
}

impl SessionHandle {
    pub fn new(session: AnalyticsSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock the session. A panic in another holder does not leave the
    /// session unusable since every field is replaced wholesale.
    pub fn lock(&self) -> MutexGuard<'_, AnalyticsSession> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut AnalyticsSession) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}
