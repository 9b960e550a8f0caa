//! Tunable thresholds for the fuzzy pipeline.

use serde::{Deserialize, Serialize};

/// Fuzzy pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySettings {
    /// Criteria weighted above this are reported as critical factors.
    #[serde(default = "default_critical_weight_threshold")]
    pub critical_weight_threshold: f64,

    /// Per-criterion score gap reported as a tradeoff.
    #[serde(default = "default_tradeoff_threshold")]
    pub tradeoff_threshold: f64,

    /// Maximum tradeoffs listed per comparison.
    #[serde(default = "default_max_tradeoffs")]
    pub max_tradeoffs: usize,

    /// Criterion uncertainty above this becomes a risk factor.
    #[serde(default = "default_uncertainty_risk_threshold")]
    pub uncertainty_risk_threshold: f64,

    /// Minimize-criterion value above this becomes a risk factor.
    #[serde(default = "default_minimize_risk_threshold")]
    pub minimize_risk_threshold: f64,

    /// Whether results carry layout hints.
    #[serde(default = "default_emit_layout")]
    pub emit_layout: bool,
}

fn default_critical_weight_threshold() -> f64 {
    0.2
}

fn default_tradeoff_threshold() -> f64 {
    0.2
}

fn default_max_tradeoffs() -> usize {
    3
}

fn default_uncertainty_risk_threshold() -> f64 {
    0.3
}

fn default_minimize_risk_threshold() -> f64 {
    0.7
}

fn default_emit_layout() -> bool {
    true
}

impl Default for FuzzySettings {
    fn default() -> Self {
        Self {
            critical_weight_threshold: default_critical_weight_threshold(),
            tradeoff_threshold: default_tradeoff_threshold(),
            max_tradeoffs: default_max_tradeoffs(),
            uncertainty_risk_threshold: default_uncertainty_risk_threshold(),
            minimize_risk_threshold: default_minimize_risk_threshold(),
            emit_layout: default_emit_layout(),
        }
    }
}
