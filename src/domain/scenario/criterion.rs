//! Criterion - A weighted, possibly uncertain decision criterion.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FuzzySet;

/// Optimization direction of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Returns true for criteria where lower values are better.
    pub fn is_minimize(&self) -> bool {
        matches!(self, Direction::Minimize)
    }

    /// Maps a performance value onto the "higher is better" scale.
    pub fn orient(&self, value: f64) -> f64 {
        match self {
            Direction::Maximize => value,
            Direction::Minimize => 1.0 - value,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Minimize => write!(f, "minimize"),
            Direction::Maximize => write!(f, "maximize"),
        }
    }
}

/// A single decision criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Baseline value of the criterion (0-1 after normalization).
    pub value: f64,
    /// Importance weight (criteria weights sum to 1 after normalization).
    pub weight: f64,
    pub direction: Direction,
    /// Custom fuzzy set; a default one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy_set: Option<FuzzySet>,
    /// Uncertainty of observed values (0-1).
    #[serde(default)]
    pub uncertainty: f64,
}

impl Criterion {
    /// Creates a criterion.
    pub fn new(value: f64, weight: f64, direction: Direction) -> Self {
        Self {
            value,
            weight,
            direction,
            fuzzy_set: None,
            uncertainty: 0.0,
        }
    }

    /// Creates a criterion where higher values are better.
    pub fn maximize(value: f64, weight: f64) -> Self {
        Self::new(value, weight, Direction::Maximize)
    }

    /// Creates a criterion where lower values are better.
    pub fn minimize(value: f64, weight: f64) -> Self {
        Self::new(value, weight, Direction::Minimize)
    }

    /// Sets the uncertainty.
    pub fn with_uncertainty(mut self, uncertainty: f64) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    /// Attaches a custom fuzzy set.
    pub fn with_fuzzy_set(mut self, fuzzy_set: FuzzySet) -> Self {
        self.fuzzy_set = Some(fuzzy_set);
        self
    }
}
