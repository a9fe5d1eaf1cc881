//! Layered error definitions
//!
//! Categorized by source: input / resample / config / sink

use thiserror::Error;

use crate::InterpolationMethod;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Input Errors =====
    /// Malformed or incomplete input record
    #[error("parse error in '{source_name}': {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    // ===== Resample Errors =====
    /// Too few attitude samples for the interpolation order
    #[error(
        "insufficient data for {method} interpolation: need at least {required} samples, got {actual}"
    )]
    InsufficientData {
        method: InterpolationMethod,
        required: usize,
        actual: usize,
    },

    /// Attitude timestamps not strictly increasing
    #[error(
        "attitude timestamps must be strictly increasing: sample {index} has t={current} after t={previous}"
    )]
    NonMonotonicTime {
        index: usize,
        previous: f64,
        current: f64,
    },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create input parse error
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create insufficient data error
    pub fn insufficient_data(method: InterpolationMethod, actual: usize) -> Self {
        Self::InsufficientData {
            method,
            required: method.min_samples(),
            actual,
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while reading or resampling the inputs.
    ///
    /// These abort a run before any sink sees data.
    pub fn is_fatal_input(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::InsufficientData { .. } | Self::NonMonotonicTime { .. }
        )
    }
}
