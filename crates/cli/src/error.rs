//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Input file not found
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    /// One or more sinks failed to write the table
    #[error("{count} sink(s) failed: {details}")]
    SinkFailures { count: usize, details: String },

    /// Blocking stage panicked or was cancelled
    #[error("Pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn input_not_found(path: impl Into<String>) -> Self {
        Self::InputNotFound { path: path.into() }
    }
}
