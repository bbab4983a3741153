//! Error types shared by runners, filters, and the harness.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for suitelog operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors raised while building, filtering, or running suites.
///
/// The suite-logging wrapper never creates these itself; it passes through
/// whatever the wrapped runner or builder returns.
#[derive(Debug, Error)]
pub enum Error {
    /// A runner could not be built for a test class.
    #[error("initialization error for {class}: {reason}")]
    Initialization {
        /// Name of the class that failed to build.
        class: String,
        /// Why construction failed.
        reason: String,
    },

    /// A filter removed every test from a runner.
    #[error("no tests remain after filter {filter}")]
    NoTestsRemain {
        /// Description of the filter that was applied.
        filter: String,
    },

    /// A filter string could not be parsed.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// A stop was requested on the notifier before the next test started.
    #[error("test run stopped by request")]
    StoppedByUser,

    /// A runner aborted for another reason.
    #[error("execution failed: {0}")]
    Execution(String),

    /// I/O error while writing output or result files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error for result files.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Helper to build an initialization error for `class`.
    pub fn init<C: Into<String>, R: Into<String>>(class: C, reason: R) -> Self {
        Self::Initialization {
            class: class.into(),
            reason: reason.into(),
        }
    }

    /// Helper to build a "no tests remain" error naming `filter`.
    pub fn no_tests_remain<F: Into<String>>(filter: F) -> Self {
        Self::NoTestsRemain {
            filter: filter.into(),
        }
    }
}
