//! Exit codes for the nf-core CLI.
//!
//! Exit code ranges:
//! - 0-9: Operational outcomes (parse outcome from code, not output)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use nf_common::{Error, ErrorCategory};

/// Exit codes for nf-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Operational Outcomes (0-9)
    // ========================================================================
    /// Success: at least one view had data
    Clean = 0,

    /// The snapshot produced no data for any view
    NoData = 1,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Configuration missing, unreadable or invalid
    ConfigError = 11,

    /// Snapshot malformed or violates ordering
    SnapshotError = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success (codes 0-1).
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean | ExitCode::NoData)
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        let code = self as i32;
        (10..20).contains(&code)
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Map a library error to the exit code automation should see.
    ///
    /// Decode failures count as bad snapshots since snapshots are the only
    /// JSON the CLI reads through this path.
    pub fn from_error(error: &Error) -> Self {
        if matches!(error, Error::Json(_)) {
            return ExitCode::SnapshotError;
        }
        match error.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Snapshot => ExitCode::SnapshotError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::NoData => "OK_NO_DATA",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::SnapshotError => "ERR_SNAPSHOT",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::NoData.is_success());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert!(!ExitCode::SnapshotError.is_internal_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::SnapshotError.to_string(), "ERR_SNAPSHOT (12)");
        assert_eq!(i32::from(ExitCode::ArgsError), 10);
    }

    #[test]
    fn test_from_error() {
        let err = Error::InvalidSnapshot("x".into());
        assert_eq!(ExitCode::from_error(&err), ExitCode::SnapshotError);
        let err = Error::Config("x".into());
        assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);
        let err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(ExitCode::from_error(&err), ExitCode::IoError);
    }
}
