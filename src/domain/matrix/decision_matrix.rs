//! Decision matrix - Observed values laid out alternatives x criteria.

use crate::domain::foundation::clamp_unit;
use crate::domain::scenario::{Direction, Scenario};
use crate::ports::ValueProvider;

/// Observed values of every alternative on every criterion.
///
/// Rows follow `alternatives`, columns follow `criteria` (name order).
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMatrix {
    pub alternatives: Vec<String>,
    pub criteria: Vec<String>,
    pub directions: Vec<Direction>,
    pub weights: Vec<f64>,
    pub values: Vec<Vec<f64>>,
}

impl DecisionMatrix {
    /// Builds the matrix by observing every pair through `provider`.
    pub fn observe(scenario: &Scenario, provider: &dyn ValueProvider) -> Self {
        let values = scenario
            .alternatives
            .iter()
            .map(|alternative| {
                scenario
                    .criteria
                    .iter()
                    .map(|(name, criterion)| {
                        clamp_unit(provider.observe(alternative, name, criterion))
                    })
                    .collect()
            })
            .collect();

        Self {
            alternatives: scenario.alternatives.clone(),
            criteria: scenario.criteria.keys().cloned().collect(),
            directions: scenario.criteria.values().map(|c| c.direction).collect(),
            weights: scenario.criteria.values().map(|c| c.weight).collect(),
            values,
        }
    }

    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    pub fn criterion_count(&self) -> usize {
        self.criteria.len()
    }

    /// Column values for criterion `j`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[j]).collect()
    }

    /// Divides each column by its Euclidean norm. Zero columns stay zero.
    pub fn vector_normalized(&self) -> Vec<Vec<f64>> {
        let norms: Vec<f64> = (0..self.criterion_count())
            .map(|j| self.column(j).iter().map(|v| v * v).sum::<f64>().sqrt())
            .collect();

        self.values
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&norms)
                    .map(|(v, norm)| if *norm > 0.0 { v / norm } else { 0.0 })
                    .collect()
            })
            .collect()
    }
}
