//! Error handling module for ClipPlan

use thiserror::Error;

use crate::domain::errors::{MetadataError, OptionsError, PlanError};

/// Failures reading or interpreting probe output
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Probe document could not be read
    #[error("Failed to read probe output {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Probe document is not valid JSON of the expected shape
    #[error("Failed to parse probe output: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field was absent or unusable
    #[error("Probe output is missing {field}")]
    Missing { field: String },

    /// The values do not describe playable media
    #[error("Probe output is invalid: {0}")]
    Invalid(#[from] MetadataError),
}

/// Failures loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Main error type for ClipPlan operations
#[derive(Error, Debug)]
pub enum ClipPlanError {
    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Planning refused the request
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Options failed boundary validation
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// Media probe error
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output rendering error
    #[error("Failed to render output: {message}")]
    OutputError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for ClipPlan operations
pub type ClipPlanResult<T> = std::result::Result<T, ClipPlanError>;
