//! Nevformance analytics configuration.
//!
//! This crate provides:
//! - Typed Rust structs for analytics.json
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod analytics;
pub mod resolve;
pub mod validate;

pub use analytics::AnalyticsConfig;
pub use resolve::{load_config, resolve_config, ConfigPath, ConfigSource};
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
