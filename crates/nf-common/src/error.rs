//! Error types for Nevformance.
//!
//! Errors only arise at the edges of the analytics core: reading snapshot
//! and config files and decoding them. The computations themselves degrade
//! to empty results instead of failing.
//!
//! Every error carries a stable numeric code, a category for grouping and a
//! remediation hint for humans:
//! ```text
//! code 21 (snapshot): series "server.tps" is not in timestamp order
//! fix: Sort the series by timestamp before handing the snapshot over.
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Nevformance operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Analytics configuration errors.
    Config,
    /// Malformed metric snapshots.
    Snapshot,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Snapshot => write!(f, "snapshot"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Nevformance.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Snapshot errors (20-29)
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("series {key:?} is not in timestamp order (index {index})")]
    UnsortedSeries { key: String, index: usize },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Snapshot errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSnapshot(_) => 20,
            Error::UnsortedSeries { .. } => 21,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::InvalidSnapshot(_) | Error::UnsortedSeries { .. } => ErrorCategory::Snapshot,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether retrying later could succeed.
    ///
    /// Snapshot files are rewritten by the collector, so a malformed or
    /// half-written snapshot usually fixes itself on the next refresh.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => false,
            Error::InvalidSnapshot(_) => true,
            Error::UnsortedSeries { .. } => false,
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'nf-core config validate' to check the analytics configuration."
            }
            Error::InvalidSnapshot(_) => {
                "The snapshot must be a JSON object mapping metric keys to arrays of {timestamp, value} points."
            }
            Error::UnsortedSeries { .. } => {
                "Sort the series by timestamp before handing the snapshot over."
            }
            Error::Io(_) => "Check that the file exists and is readable. Retry the operation.",
            Error::Json(_) => {
                "Invalid JSON in file. Check syntax with 'jq . <file>' or wait for the next collector write."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_grouped_by_category() {
        let cases = [
            (Error::Config("x".into()), ErrorCategory::Config),
            (Error::InvalidSnapshot("x".into()), ErrorCategory::Snapshot),
            (
                Error::UnsortedSeries {
                    key: "k".into(),
                    index: 1,
                },
                ErrorCategory::Snapshot,
            ),
        ];
        for (err, category) in cases {
            assert_eq!(err.category(), category);
            let code = err.code();
            match category {
                ErrorCategory::Config => assert!((10..20).contains(&code)),
                ErrorCategory::Snapshot => assert!((20..30).contains(&code)),
                ErrorCategory::Io => assert!((60..70).contains(&code)),
            }
        }
    }

    #[test]
    fn test_json_error_converts() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), 61);
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_unsorted_series_message() {
        let err = Error::UnsortedSeries {
            key: "server.tps".into(),
            index: 3,
        };
        assert!(err.to_string().contains("server.tps"));
        assert!(err.to_string().contains("index 3"));
        assert!(!err.remediation().is_empty());
    }
}
