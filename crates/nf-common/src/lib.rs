//! Nevformance common types and errors.
//!
//! This crate provides the foundation shared by the analytics crates:
//! - The metric data model (points, series, snapshots)
//! - Shared analysis parameters (time ranges, windows)
//! - Compound metric key parsing and display labels
//! - Entity category taxonomy and the rule-driven classifier
//! - Common error types
//! - Output format specifications

pub mod categories;
pub mod error;
pub mod keys;
pub mod labels;
pub mod metric;
pub mod output;
pub mod params;

pub use categories::{
    Category, CategoryClassifier, CategoryTotals, ClassificationRule, RuleMatcher,
};
pub use error::{Error, ErrorCategory, Result};
pub use keys::{parse_key, ChunkCoord, KeyShape, ParsedKey};
pub use metric::{MetricPoint, MetricSeries, MetricSnapshot};
pub use output::OutputFormat;
pub use params::{TimeRange, Window};

/// Schema version for emitted reports.
pub const SCHEMA_VERSION: &str = "1.0.0";
