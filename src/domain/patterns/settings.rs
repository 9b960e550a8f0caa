//! Tunable thresholds for pattern recognition.

use serde::{Deserialize, Serialize};

/// Pattern recognition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSettings {
    /// Patterns observed fewer times than this are dropped.
    #[serde(default = "default_min_frequency")]
    pub min_frequency: f64,

    /// Minimum |r| for a correlation pattern.
    #[serde(default = "default_correlation_threshold")]
    pub correlation_threshold: f64,

    /// Minimum strength for a daily or weekly cycle.
    #[serde(default = "default_cyclical_threshold")]
    pub cyclical_threshold: f64,

    /// Minimum consistency for a behavioral style.
    #[serde(default = "default_consistency_threshold")]
    pub consistency_threshold: f64,

    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_min_frequency() -> f64 {
    3.0
}

fn default_correlation_threshold() -> f64 {
    0.5
}

fn default_cyclical_threshold() -> f64 {
    0.6
}

fn default_consistency_threshold() -> f64 {
    0.6
}

fn default_max_recommendations() -> usize {
    5
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            min_frequency: default_min_frequency(),
            correlation_threshold: default_correlation_threshold(),
            cyclical_threshold: default_cyclical_threshold(),
            consistency_threshold: default_consistency_threshold(),
            max_recommendations: default_max_recommendations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let settings: PatternSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, PatternSettings::default());
    }

    #[test]
    fn defaults_match_documented_constants() {
        let settings = PatternSettings::default();
        assert_eq!(settings.min_frequency, 3.0);
        assert_eq!(settings.correlation_threshold, 0.5);
        assert_eq!(settings.max_recommendations, 5);
    }
}
