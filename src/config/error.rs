//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must lie in [0, 1], got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    #[error("At least one sensitivity multiplier is required")]
    NoSensitivityMultipliers,

    #[error("Sensitivity multipliers must be positive and finite, got {0}")]
    InvalidMultiplier(f64),

    #[error("Optimizer needs at least one iteration")]
    ZeroIterations,

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("Invalid log level directive: {0}")]
    InvalidLogLevel(String),
}
