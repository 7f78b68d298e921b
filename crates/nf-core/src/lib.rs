//! Nevformance Core Library
//!
//! Turns raw metric snapshots into analytical views:
//! - Time-range filtering of series
//! - Histogram, rate-window and correlation analyses
//! - Entity classification and top-N rankings
//! - Sessions and the periodic refresh loop
//! - Exit codes and logging for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod correlate;
pub mod exit_codes;
pub mod logging;
pub mod rank;
pub mod rate;
pub mod refresh;
pub mod series;
pub mod session;
pub mod views;

pub use session::{AnalyticsSession, SessionHandle};
pub use views::{AnalysisParams, Analyzer, AnalyticsReport, ViewState};
