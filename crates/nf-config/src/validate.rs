//! Configuration validation errors and semantic validation.

use crate::analytics::{AnalyticsConfig, BucketSpec, WindowSpec};
use nf_common::{RuleMatcher, TimeRange};
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Refresh ticks faster than this would hammer the snapshot source.
pub const MIN_REFRESH_INTERVAL_MS: u64 = 250;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SchemaError(_) => 62,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate analytics configuration semantically.
pub fn validate_config(config: &AnalyticsConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if config.refresh.interval_ms < MIN_REFRESH_INTERVAL_MS {
        return Err(ValidationError::InvalidValue {
            field: "refresh.interval_ms".to_string(),
            message: format!(
                "Must be at least {}, got {}",
                MIN_REFRESH_INTERVAL_MS, config.refresh.interval_ms
            ),
        });
    }

    if TimeRange::parse_label(&config.refresh.default_time_range).is_none() {
        return Err(ValidationError::InvalidValue {
            field: "refresh.default_time_range".to_string(),
            message: format!(
                "Unknown range '{}', expected one of 5m, 15m, 30m, 1h",
                config.refresh.default_time_range
            ),
        });
    }

    require_key("distribution.metric", &config.distribution.metric)?;
    validate_buckets(&config.distribution.buckets)?;

    validate_windows(&config.lag_spikes.windows)?;
    if config.lag_spikes.event_metrics.is_empty() && config.lag_spikes.derive_from_metric.is_none()
    {
        return Err(ValidationError::SemanticError(
            "lag_spikes needs at least one event metric or a derive_from_metric".to_string(),
        ));
    }
    if !config.lag_spikes.spike_threshold_ms.is_finite() || config.lag_spikes.spike_threshold_ms <= 0.0
    {
        return Err(ValidationError::InvalidValue {
            field: "lag_spikes.spike_threshold_ms".to_string(),
            message: format!("Must be positive, got {}", config.lag_spikes.spike_threshold_ms),
        });
    }

    if config.correlation.tolerance_ms <= 0 {
        return Err(ValidationError::InvalidValue {
            field: "correlation.tolerance_ms".to_string(),
            message: format!("Must be positive, got {}", config.correlation.tolerance_ms),
        });
    }
    require_key("correlation.default_x", &config.correlation.default_x)?;
    require_key("correlation.default_y", &config.correlation.default_y)?;

    positive_count("entities.type_top_n", config.entities.type_top_n)?;
    positive_count("entities.hotspot_top_n", config.entities.hotspot_top_n)?;
    positive_count("entities.hotspot_detail_top_n", config.entities.hotspot_detail_top_n)?;
    if let Some(rules) = &config.entities.rules {
        validate_rules(rules)?;
    }

    positive_count("chunks.active_top_n", config.chunks.active_top_n)?;
    positive_count("chunks.block_entity_top_n", config.chunks.block_entity_top_n)?;

    if config.overview.performance_metrics.is_empty() {
        return Err(ValidationError::MissingField(
            "overview.performance_metrics".to_string(),
        ));
    }
    if config.overview.population_metrics.is_empty() {
        return Err(ValidationError::MissingField(
            "overview.population_metrics".to_string(),
        ));
    }
    if config.overview.axis_headroom < 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "overview.axis_headroom".to_string(),
            message: format!("Must be >= 1.0, got {}", config.overview.axis_headroom),
        });
    }

    if config.system.gc_candidates.iter().any(|set| set.is_empty()) {
        return Err(ValidationError::InvalidValue {
            field: "system.gc_candidates".to_string(),
            message: "candidate sets must not be empty".to_string(),
        });
    }

    Ok(())
}

fn require_key(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    Ok(())
}

fn positive_count(field: &str, value: usize) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "Must be > 0".to_string(),
        });
    }
    Ok(())
}

/// Buckets must ascend without gaps and end in one unbounded bin.
fn validate_buckets(buckets: &[BucketSpec]) -> ValidationResult<()> {
    if buckets.is_empty() {
        return Err(ValidationError::MissingField("distribution.buckets".to_string()));
    }

    for (i, bucket) in buckets.iter().enumerate() {
        let field = format!("distribution.buckets[{}]", i);
        let is_last = i + 1 == buckets.len();

        match (bucket.max, is_last) {
            (None, false) => {
                return Err(ValidationError::InvalidValue {
                    field,
                    message: "only the last bucket may be unbounded".to_string(),
                });
            }
            (Some(_), true) => {
                return Err(ValidationError::InvalidValue {
                    field,
                    message: "last bucket must be unbounded (max: null)".to_string(),
                });
            }
            (Some(max), false) if max <= bucket.min => {
                return Err(ValidationError::InvalidValue {
                    field,
                    message: format!("max {} must exceed min {}", max, bucket.min),
                });
            }
            _ => {}
        }

        if let Some(next) = buckets.get(i + 1) {
            if bucket.max != Some(next.min) {
                return Err(ValidationError::SemanticError(format!(
                    "bucket '{}' ends at {:?} but '{}' starts at {}",
                    bucket.label, bucket.max, next.label, next.min
                )));
            }
        }
    }

    Ok(())
}

/// Windows must be positive and strictly ascending.
fn validate_windows(windows: &[WindowSpec]) -> ValidationResult<()> {
    if windows.is_empty() {
        return Err(ValidationError::MissingField("lag_spikes.windows".to_string()));
    }

    let mut previous = 0u64;
    for (i, window) in windows.iter().enumerate() {
        if window.seconds <= previous {
            return Err(ValidationError::InvalidValue {
                field: format!("lag_spikes.windows[{}].seconds", i),
                message: format!(
                    "Must be positive and greater than the previous window ({}), got {}",
                    previous, window.seconds
                ),
            });
        }
        previous = window.seconds;
    }

    Ok(())
}

fn validate_rules(rules: &[nf_common::ClassificationRule]) -> ValidationResult<()> {
    for (i, rule) in rules.iter().enumerate() {
        let values = match &rule.matcher {
            RuleMatcher::ExactKey(v) | RuleMatcher::TokenIn(v) | RuleMatcher::TokenContains(v) => v,
        };
        if values.is_empty() || values.iter().any(|v| v.is_empty()) {
            return Err(ValidationError::InvalidValue {
                field: format!("entities.rules[{}]", i),
                message: "matcher values must be non-empty".to_string(),
            });
        }
    }
    Ok(())
}
