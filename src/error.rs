//! Error types for the regression harness
//!
//! Everything that aborts a run before the test loop starts is a
//! [`HarnessError`]. Per-test comparison failures live in
//! [`crate::compare::CompareError`] and never abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the harness
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Bad flag or positional argument count
    #[error("{0}")]
    Usage(String),

    /// Options file or input file cannot be opened for reading
    #[error("{} not readable", path.display())]
    NotReadable { path: PathBuf },

    /// Encoder not found as an executable on the search path
    #[error("{} is not executable", program.display())]
    NotExecutable { program: PathBuf },

    /// I/O failure after the precondition checks passed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the report to stdout failed
    #[error("cannot write report: {0}")]
    Report(#[from] std::io::Error),
}

impl HarnessError {
    /// Whether the error should be followed by the usage text.
    ///
    /// Argument and precondition failures print usage; late I/O failures
    /// do not.
    pub fn shows_usage(&self) -> bool {
        !matches!(self, HarnessError::Io { .. } | HarnessError::Report(_))
    }
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
