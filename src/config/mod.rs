//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FUZZY_DECISION` prefix and nested values use double underscores as separators.
//!
//! Every section has defaults, so an empty environment yields a usable
//! configuration.
//!
//! # Example
//!
//! ```no_run
//! use fuzzy_decision_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Sensitivity multipliers: {:?}", config.matrix.sensitivity_multipliers);
//! ```

mod error;
mod telemetry;

pub use error::{ConfigError, ValidationError};
pub use telemetry::TelemetryConfig;

use serde::Deserialize;
use std::path::Path;

use crate::adapters::ObservationSettings;
use crate::domain::fuzzy::FuzzySettings;
use crate::domain::matrix::MatrixSettings;
use crate::domain::patterns::PatternSettings;

const ENV_PREFIX: &str = "FUZZY_DECISION";

/// Keys whose environment values are comma-separated lists
const LIST_KEYS: [&str; 1] = ["matrix.sensitivity_multipliers"];

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Fuzzy ranking and reasoning thresholds
    #[serde(default)]
    pub fuzzy: FuzzySettings,

    /// TOPSIS/AHP, sensitivity and optimizer settings
    #[serde(default)]
    pub matrix: MatrixSettings,

    /// Pattern recognition thresholds
    #[serde(default)]
    pub patterns: PatternSettings,

    /// Default value provider tuning
    #[serde(default)]
    pub observation: ObservationSettings,

    /// Log output
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FUZZY_DECISION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FUZZY_DECISION__FUZZY__CRITICAL_WEIGHT_THRESHOLD=0.25`
    /// - `FUZZY_DECISION__MATRIX__SENSITIVITY_MULTIPLIERS=0.5,1.0,1.5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a TOML, JSON or YAML file, with environment
    /// variables layered on top.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or malformed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first out-of-range value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_fuzzy()?;
        self.validate_matrix()?;
        self.validate_patterns()?;
        unit("observation.spread", self.observation.spread)?;
        unit("observation.keyword_bias", self.observation.keyword_bias)?;
        self.telemetry.validate()?;
        Ok(())
    }

    fn validate_fuzzy(&self) -> Result<(), ValidationError> {
        let fuzzy = &self.fuzzy;
        unit("fuzzy.critical_weight_threshold", fuzzy.critical_weight_threshold)?;
        unit("fuzzy.tradeoff_threshold", fuzzy.tradeoff_threshold)?;
        unit("fuzzy.uncertainty_risk_threshold", fuzzy.uncertainty_risk_threshold)?;
        unit("fuzzy.minimize_risk_threshold", fuzzy.minimize_risk_threshold)?;
        Ok(())
    }

    fn validate_matrix(&self) -> Result<(), ValidationError> {
        let matrix = &self.matrix;
        if matrix.sensitivity_multipliers.is_empty() {
            return Err(ValidationError::NoSensitivityMultipliers);
        }
        if let Some(&bad) = matrix
            .sensitivity_multipliers
            .iter()
            .find(|m| !m.is_finite() || **m <= 0.0)
        {
            return Err(ValidationError::InvalidMultiplier(bad));
        }
        unit(
            "matrix.consistency_warning_threshold",
            matrix.consistency_warning_threshold,
        )?;
        if matrix.optimizer_max_iterations == 0 {
            return Err(ValidationError::ZeroIterations);
        }
        positive("matrix.optimizer_tolerance", matrix.optimizer_tolerance)?;
        positive("matrix.optimizer_step", matrix.optimizer_step)?;
        Ok(())
    }

    fn validate_patterns(&self) -> Result<(), ValidationError> {
        let patterns = &self.patterns;
        unit("patterns.correlation_threshold", patterns.correlation_threshold)?;
        unit("patterns.cyclical_threshold", patterns.cyclical_threshold)?;
        unit("patterns.consistency_threshold", patterns.consistency_threshold)?;
        Ok(())
    }
}

fn environment() -> config::Environment {
    let environment = config::Environment::default()
        .prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",");
    LIST_KEYS
        .iter()
        .fold(environment, |env, key| env.with_list_parse_key(key))
}

fn unit(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ThresholdOutOfRange { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}
