//! Hash-based ValueProvider - Deterministic stand-in for real telemetry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{clamp_unit, stable_hash};
use crate::domain::scenario::Criterion;
use crate::ports::ValueProvider;

/// Tuning for the hash-based provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSettings {
    /// Scale of the hash-derived offset added to the base value.
    #[serde(default = "default_spread")]
    pub spread: f64,

    /// Magnitude of the keyword bias.
    #[serde(default = "default_keyword_bias")]
    pub keyword_bias: f64,
}

fn default_spread() -> f64 {
    0.3
}

fn default_keyword_bias() -> f64 {
    0.1
}

impl Default for ObservationSettings {
    fn default() -> Self {
        Self {
            spread: default_spread(),
            keyword_bias: default_keyword_bias(),
        }
    }
}

/// Keywords whose criteria are observed lower than their base value.
const DOWNWARD_KEYWORDS: [&str; 2] = ["cost", "risk"];

/// Keywords whose criteria are observed higher than their base value.
const UPWARD_KEYWORDS: [&str; 2] = ["quality", "performance"];

/// Number of hash-derived uniforms averaged into the noise term.
const NOISE_SAMPLES: u32 = 3;

/// Produces observations from a stable hash of the alternative and
/// criterion names, blended with the criterion's base value.
///
/// Uncertainty noise is derived from the same hash, so repeated calls
/// return identical values.
#[derive(Debug, Clone, Default)]
pub struct HashValueProvider {
    settings: ObservationSettings,
}

impl HashValueProvider {
    pub fn new(settings: ObservationSettings) -> Self {
        Self { settings }
    }

    fn keyword_bias(&self, criterion_name: &str) -> f64 {
        let name = criterion_name.to_lowercase();
        if DOWNWARD_KEYWORDS.iter().any(|k| name.contains(k)) {
            -self.settings.keyword_bias
        } else if UPWARD_KEYWORDS.iter().any(|k| name.contains(k)) {
            self.settings.keyword_bias
        } else {
            0.0
        }
    }

    /// Centered noise in [-0.5, 0.5], bell-shaped (mean of uniforms).
    fn noise(key: &str) -> f64 {
        let sum: f64 = (0..NOISE_SAMPLES)
            .map(|i| f64::from(stable_hash(&format!("{}#{}", key, i)) % 1000) / 1000.0)
            .sum();
        sum / f64::from(NOISE_SAMPLES) - 0.5
    }
}

impl ValueProvider for HashValueProvider {
    fn observe(&self, alternative: &str, criterion_name: &str, criterion: &Criterion) -> f64 {
        let key = format!("{}{}", alternative, criterion_name);
        let offset = f64::from(stable_hash(&key) % 100) / 100.0 * self.settings.spread;
        let noise = if criterion.uncertainty > 0.0 {
            Self::noise(&key) * criterion.uncertainty
        } else {
            0.0
        };

        clamp_unit(criterion.value + offset + self.keyword_bias(criterion_name) + noise)
    }
}
