//! Analytics configuration types.
//!
//! Every section and field has a default, so `{"schema_version": "1.0.0"}`
//! is a complete configuration and a partial file only overrides what it
//! names.

use nf_common::{ClassificationRule, TimeRange, Window};
use nf_math::Bucket;
use serde::{Deserialize, Serialize};

/// Complete analytics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub schema_version: String,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub distribution: DistributionConfig,

    #[serde(default)]
    pub lag_spikes: LagSpikeConfig,

    #[serde(default)]
    pub correlation: CorrelationConfig,

    #[serde(default)]
    pub entities: EntityConfig,

    #[serde(default)]
    pub chunks: ChunkConfig,

    #[serde(default)]
    pub overview: OverviewConfig,

    #[serde(default)]
    pub system: SystemConfig,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            refresh: RefreshConfig::default(),
            distribution: DistributionConfig::default(),
            lag_spikes: LagSpikeConfig::default(),
            correlation: CorrelationConfig::default(),
            entities: EntityConfig::default(),
            chunks: ChunkConfig::default(),
            overview: OverviewConfig::default(),
            system: SystemConfig::default(),
            notes: None,
        }
    }
}

impl AnalyticsConfig {
    /// Load analytics configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::validate::ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::validate::ValidationError::IoError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse_json(&content)
    }

    /// Parse analytics configuration from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            crate::validate::ValidationError::ParseError(format!("Invalid JSON: {}", e))
        })
    }

    /// Default time range as a typed value.
    pub fn default_time_range(&self) -> TimeRange {
        TimeRange::from_label(&self.refresh.default_time_range)
    }

    /// Histogram templates for the distribution view.
    pub fn bucket_templates(&self) -> Vec<Bucket> {
        self.distribution.buckets.iter().map(BucketSpec::template).collect()
    }

    /// Rolling windows for the lag-spike view.
    pub fn lag_windows(&self) -> Vec<Window> {
        self.lag_spikes.windows.iter().map(WindowSpec::window).collect()
    }
}

/// Refresh cadence and startup parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Interval between refresh ticks in milliseconds.
    pub interval_ms: u64,
    /// Time range label used until a caller picks another.
    pub default_time_range: String,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            default_time_range: TimeRange::default().label().to_string(),
        }
    }
}

/// One histogram bin. `max: None` means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub label: String,
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

impl BucketSpec {
    pub fn new(label: &str, min: f64, max: Option<f64>) -> Self {
        Self {
            label: label.to_string(),
            min,
            max,
        }
    }

    pub fn template(&self) -> Bucket {
        Bucket::template(self.label.clone(), self.min, self.max.unwrap_or(f64::INFINITY))
    }
}

/// Tick-time distribution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    pub metric: String,
    pub buckets: Vec<BucketSpec>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            metric: "server.tick_time".to_string(),
            buckets: vec![
                BucketSpec::new("0-5ms", 0.0, Some(5.0)),
                BucketSpec::new("5-10ms", 5.0, Some(10.0)),
                BucketSpec::new("10-15ms", 10.0, Some(15.0)),
                BucketSpec::new("15-20ms", 15.0, Some(20.0)),
                BucketSpec::new("20-25ms", 20.0, Some(25.0)),
                BucketSpec::new("25-50ms", 25.0, Some(50.0)),
                BucketSpec::new("50ms+", 50.0, None),
            ],
        }
    }
}

/// A rolling window in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub label: String,
    pub seconds: u64,
}

impl WindowSpec {
    pub fn new(label: &str, seconds: u64) -> Self {
        Self {
            label: label.to_string(),
            seconds,
        }
    }

    pub fn window(&self) -> Window {
        let ms = i64::try_from(self.seconds.saturating_mul(1000)).unwrap_or(i64::MAX);
        Window::new(self.label.clone(), ms)
    }
}

/// Lag-spike rate settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LagSpikeConfig {
    /// Event series tried in order; every point is one spike.
    pub event_metrics: Vec<String>,
    /// When no event series has data, spikes are derived from this metric.
    pub derive_from_metric: Option<String>,
    /// Samples of `derive_from_metric` above this count as spikes.
    pub spike_threshold_ms: f64,
    pub windows: Vec<WindowSpec>,
}

impl Default for LagSpikeConfig {
    fn default() -> Self {
        Self {
            event_metrics: vec!["server.lag_spikes.current".to_string()],
            derive_from_metric: Some("server.tick_time".to_string()),
            spike_threshold_ms: 100.0,
            windows: vec![
                WindowSpec::new("Last Minute", 60),
                WindowSpec::new("Last 5 Minutes", 5 * 60),
                WindowSpec::new("Last 15 Minutes", 15 * 60),
                WindowSpec::new("Last 30 Minutes", 30 * 60),
                WindowSpec::new("Last Hour", 60 * 60),
            ],
        }
    }
}

/// Correlation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Match window; timestamps closer than this are paired.
    pub tolerance_ms: i64,
    pub default_x: String,
    pub default_y: String,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            tolerance_ms: 1000,
            default_x: "server.tps".to_string(),
            default_y: "server.tick_time".to_string(),
        }
    }
}

/// Entity view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Only keys under this prefix are classified.
    pub prefix: String,
    pub type_top_n: usize,
    pub hotspot_top_n: usize,
    /// Per-hotspot entity types listed as detail.
    pub hotspot_detail_top_n: usize,
    /// Replacement classification table; `None` keeps the stock rules.
    pub rules: Option<Vec<ClassificationRule>>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            prefix: "entities.".to_string(),
            type_top_n: 10,
            hotspot_top_n: 15,
            hotspot_detail_top_n: 3,
            rules: None,
        }
    }
}

/// Chunk view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    pub active_top_n: usize,
    pub block_entity_top_n: usize,
    pub load_rate_metric: String,
    pub unload_rate_metric: String,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            active_top_n: 15,
            block_entity_top_n: 10,
            load_rate_metric: "chunks.load_rate".to_string(),
            unload_rate_metric: "chunks.unload_rate".to_string(),
        }
    }
}

/// Overview settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    /// Metrics whose latest value is shown as a headline figure.
    pub headline_metrics: Vec<String>,
    /// Choices for the performance trend; the first is the default.
    pub performance_metrics: Vec<String>,
    /// Choices for the population trend; the first is the default.
    pub population_metrics: Vec<String>,
    /// Fixed y-axis maximum for TPS charts.
    pub tps_axis_max: f64,
    /// Floor for the computed y-axis maximum of other trends.
    pub min_axis_max: f64,
    /// Headroom factor applied to the observed maximum.
    pub axis_headroom: f64,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            headline_metrics: [
                "server.tps",
                "server.tick_time",
                "memory.heap.used",
                "memory.heap.max",
                "entities.total",
                "chunks.loaded",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            performance_metrics: vec!["server.tps".to_string(), "server.tick_time".to_string()],
            population_metrics: vec!["entities.total".to_string(), "chunks.loaded".to_string()],
            tps_axis_max: 20.0,
            min_axis_max: 50.0,
            axis_headroom: 1.2,
        }
    }
}

/// System view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Candidate GC key sets, tried in order.
    pub gc_candidates: Vec<Vec<String>>,
    /// Substrings that mark a key as GC-related when no candidate has data.
    pub gc_search_tokens: Vec<String>,
    /// How many search hits the fallback plots.
    pub gc_search_limit: usize,
    pub cpu_metrics: Vec<String>,
    pub thread_metrics: Vec<String>,
    pub memory_metrics: Vec<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let strings = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            gc_candidates: vec![strings(&["gc.young.rate", "gc.old.rate"])],
            gc_search_tokens: strings(&["gc", "garbage", "collector"]),
            gc_search_limit: 2,
            cpu_metrics: strings(&["cpu.system", "cpu.process"]),
            thread_metrics: strings(&["threads.active"]),
            memory_metrics: strings(&[
                "memory.heap.used",
                "memory.heap.committed",
                "memory.nonheap.used",
            ]),
        }
    }
}
