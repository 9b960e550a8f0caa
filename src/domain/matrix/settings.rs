//! Tunable parameters for the matrix methods.

use serde::{Deserialize, Serialize};

/// Matrix method settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSettings {
    /// Uniform weight multipliers tried by sensitivity analysis.
    #[serde(default = "default_sensitivity_multipliers")]
    pub sensitivity_multipliers: Vec<f64>,

    /// AHP consistency ratio above which a warning is logged.
    #[serde(default = "default_consistency_warning_threshold")]
    pub consistency_warning_threshold: f64,

    #[serde(default = "default_optimizer_max_iterations")]
    pub optimizer_max_iterations: u32,

    /// Search stops once the step shrinks below this.
    #[serde(default = "default_optimizer_tolerance")]
    pub optimizer_tolerance: f64,

    /// Initial coordinate step of the weight search.
    #[serde(default = "default_optimizer_step")]
    pub optimizer_step: f64,
}

fn default_sensitivity_multipliers() -> Vec<f64> {
    vec![0.8, 0.9, 1.0, 1.1, 1.2]
}

fn default_consistency_warning_threshold() -> f64 {
    0.1
}

fn default_optimizer_max_iterations() -> u32 {
    100
}

fn default_optimizer_tolerance() -> f64 {
    0.001
}

fn default_optimizer_step() -> f64 {
    0.05
}

impl Default for MatrixSettings {
    fn default() -> Self {
        Self {
            sensitivity_multipliers: default_sensitivity_multipliers(),
            consistency_warning_threshold: default_consistency_warning_threshold(),
            optimizer_max_iterations: default_optimizer_max_iterations(),
            optimizer_tolerance: default_optimizer_tolerance(),
            optimizer_step: default_optimizer_step(),
        }
    }
}
