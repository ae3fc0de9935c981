//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid question timeout")]
    InvalidTimeout,

    #[error("max_histories must be at least 1")]
    InvalidMaxHistories,

    #[error("No brains configured")]
    NoBrainsConfigured,

    #[error("Brain id must not be empty")]
    EmptyBrainId,

    #[error("Duplicate brain id: {0}")]
    DuplicateBrainId(String),
}
