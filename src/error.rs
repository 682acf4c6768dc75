//! Unified error types for chainguard with fail-open philosophy.
//!
//! Every error here is an infrastructure error: a missing config file, an
//! unreachable tracker binary, a marker directory that cannot be created.
//! None of them may block the agent's work. Callers log a warning and fall
//! back to a safe default instead of propagating failures to the host.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for chainguard operations.
#[derive(Error, Debug)]
pub enum ChainguardError {
    /// I/O errors from marker files, rule files, or config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Session tracker subprocess errors (missing binary, timeout, bad exit).
    #[error("tracker error: {message}")]
    Tracker { message: String },

    /// JSON parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Linter or scanner subprocess errors.
    #[error("scan error: {message}")]
    Scan { message: String },
}

/// A specialized Result type for chainguard operations.
pub type Result<T> = std::result::Result<T, ChainguardError>;

impl ChainguardError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a tracker error.
    pub fn tracker(message: impl Into<String>) -> Self {
        Self::Tracker {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a scan error.
    pub fn scan(message: impl Into<String>) -> Self {
        Self::Scan {
            message: message.into(),
        }
    }
}

impl From<io::Error> for ChainguardError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ChainguardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Log the error as a warning and return a safe value. Warnings go to
/// tracing, never to stdout: stdout is the advisory channel read by the
/// host runtime.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the chainguard CLI.
///
/// These are the codes the host runtime interprets: 0 lets the action
/// proceed, 2 blocks it and surfaces the printed message to the agent.
pub mod exit_codes {
    /// Exit code indicating approval (allow action to proceed).
    pub const APPROVE: i32 = 0;

    /// Exit code indicating a generic command failure (non-hook commands).
    pub const ERROR: i32 = 1;

    /// Exit code indicating a blocking denial.
    pub const BLOCK: i32 = 2;

    /// Exit code indicating a crash (fail-open, treated as approve).
    pub const CRASH: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = ChainguardError::storage(
            "/tmp/marker",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/marker"));
    }

    #[test]
    fn test_tracker_error_display() {
        let err = ChainguardError::tracker("chainlink timed out");
        assert_eq!(err.to_string(), "tracker error: chainlink timed out");
    }

    #[test]
    fn test_config_error_display() {
        let err = ChainguardError::config("invalid JSON");
        assert_eq!(err.to_string(), "config error: invalid JSON");
    }

    #[test]
    fn test_scan_error_display() {
        let err = ChainguardError::scan("clippy exited abnormally");
        assert_eq!(err.to_string(), "scan error: clippy exited abnormally");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: ChainguardError = io_err.into();
        assert!(matches!(err, ChainguardError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ChainguardError = json_err.into();
        assert!(matches!(err, ChainguardError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(ChainguardError::tracker("test"));
        let value = result.fail_open_default("test context");
        assert!(value.is_empty());
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<i32> = Err(ChainguardError::config("test"));
        let value = result.fail_open_with("test context", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_fail_open_success() {
        let result: Result<i32> = Ok(100);
        let value = result.fail_open_default("test context");
        assert_eq!(value, 100);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::APPROVE, 0);
        assert_eq!(exit_codes::ERROR, 1);
        assert_eq!(exit_codes::BLOCK, 2);
        assert_eq!(exit_codes::CRASH, 3);
    }
}
