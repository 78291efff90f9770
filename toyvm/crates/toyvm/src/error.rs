//! Error handling module for the toy stack machine.
//!
//! This module provides custom error types using `thiserror` for structured
//! error handling across parsing, execution and the demonstration scenarios.

use thiserror::Error;
use toygc::GcError;

/// Main error type for the toy stack machine.
#[derive(Error, Debug)]
pub enum VmError {
    /// Error raised by the collector (root stack, handles, memory).
    #[error("GC error: {0}")]
    Gc(#[from] GcError),

    /// Error when program text cannot be parsed.
    #[error("Parse error on line {line} at `{token}`: {reason}")]
    Parse {
        line: usize,
        token: String,
        reason: String,
    },

    /// A demonstration scenario ended with the wrong live object count.
    #[error("Scenario '{name}' failed: expected {expected} live objects, found {actual}")]
    ScenarioFailed {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VmError {
    pub(crate) fn parse(line: usize, token: impl Into<String>, reason: impl Into<String>) -> Self {
        VmError::Parse {
            line,
            token: token.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using VmError.
pub type Result<T> = std::result::Result<T, VmError>;
