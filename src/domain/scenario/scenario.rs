//! Scenario - The decision problem: alternatives scored against criteria.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Criterion;
use crate::domain::foundation::Timestamp;

/// Default score penalty for a violated soft constraint.
pub const DEFAULT_SOFT_PENALTY: f64 = 0.1;

/// Tolerance used by the equality operator.
const EQUALITY_TOLERANCE: f64 = 1e-6;

/// Whether a constraint disqualifies or only penalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Hard,
    Soft,
}

/// Comparison applied between an observed value and the constraint value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintOperator {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<=")]
    AtMost,
    #[serde(rename = ">=")]
    AtLeast,
}

impl ConstraintOperator {
    /// Returns true if `observed <op> bound` holds.
    pub fn holds(&self, observed: f64, bound: f64) -> bool {
        match self {
            ConstraintOperator::LessThan => observed < bound,
            ConstraintOperator::GreaterThan => observed > bound,
            ConstraintOperator::Equal => (observed - bound).abs() <= EQUALITY_TOLERANCE,
            ConstraintOperator::AtMost => observed <= bound,
            ConstraintOperator::AtLeast => observed >= bound,
        }
    }
}

impl fmt::Display for ConstraintOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintOperator::LessThan => "<",
            ConstraintOperator::GreaterThan => ">",
            ConstraintOperator::Equal => "=",
            ConstraintOperator::AtMost => "<=",
            ConstraintOperator::AtLeast => ">=",
        };
        write!(f, "{}", s)
    }
}

/// A requirement on an alternative's observed value for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionConstraint {
    pub kind: ConstraintKind,
    pub criterion: String,
    pub operator: ConstraintOperator,
    pub value: f64,
    /// Score penalty for soft violations; defaults to 0.1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty: Option<f64>,
}

impl DecisionConstraint {
    /// Creates a hard constraint.
    pub fn hard(criterion: impl Into<String>, operator: ConstraintOperator, value: f64) -> Self {
        Self {
            kind: ConstraintKind::Hard,
            criterion: criterion.into(),
            operator,
            value,
            penalty: None,
        }
    }

    /// Creates a soft constraint with the default penalty.
    pub fn soft(criterion: impl Into<String>, operator: ConstraintOperator, value: f64) -> Self {
        Self {
            kind: ConstraintKind::Soft,
            criterion: criterion.into(),
            operator,
            value,
            penalty: None,
        }
    }

    /// Overrides the soft penalty.
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = Some(penalty);
        self
    }

    /// Returns true if an observed value violates this constraint.
    pub fn is_violated_by(&self, observed: f64) -> bool {
        !self.operator.holds(observed, self.value)
    }

    /// Penalty applied on soft violation.
    pub fn soft_penalty(&self) -> f64 {
        self.penalty.unwrap_or(DEFAULT_SOFT_PENALTY)
    }

    /// Human-readable form, e.g. `cost <= 0.5`.
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.criterion, self.operator, self.value)
    }
}

/// A decision problem.
///
/// Scenarios are treated as immutable: normalization and weight changes
/// return new copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Criteria keyed by name, iterated in name order.
    pub criteria: BTreeMap<String, Criterion>,
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<DecisionConstraint>,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl Scenario {
    /// Creates a builder for a scenario.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> ScenarioBuilder {
        ScenarioBuilder::new(id, name)
    }

    /// Returns the criterion weights keyed by name.
    pub fn weights(&self) -> BTreeMap<String, f64> {
        self.criteria
            .iter()
            .map(|(name, c)| (name.clone(), c.weight))
            .collect()
    }

    /// Returns a copy with the given weights applied.
    ///
    /// Criteria missing from `weights` keep their weight.
    pub fn with_weights(&self, weights: &BTreeMap<String, f64>) -> Self {
        let mut scenario = self.clone();
        for (name, criterion) in scenario.criteria.iter_mut() {
            if let Some(weight) = weights.get(name) {
                criterion.weight = *weight;
            }
        }
        scenario
    }

    /// Mean uncertainty across criteria; 0 when there are none.
    pub fn average_uncertainty(&self) -> f64 {
        if self.criteria.is_empty() {
            return 0.0;
        }
        self.criteria.values().map(|c| c.uncertainty).sum::<f64>() / self.criteria.len() as f64
    }

    /// Constraints that apply to a criterion.
    pub fn constraints_for<'a>(
        &'a self,
        criterion: &'a str,
    ) -> impl Iterator<Item = &'a DecisionConstraint> + 'a {
        self.constraints
            .iter()
            .filter(move |c| c.criterion == criterion)
    }
}

/// Builder for constructing Scenario instances.
#[derive(Debug)]
pub struct ScenarioBuilder {
    id: String,
    name: String,
    description: Option<String>,
    criteria: BTreeMap<String, Criterion>,
    alternatives: Vec<String>,
    constraints: Vec<DecisionConstraint>,
}

impl ScenarioBuilder {
    /// Creates a new builder.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            criteria: BTreeMap::new(),
            alternatives: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a criterion.
    pub fn criterion(mut self, name: impl Into<String>, criterion: Criterion) -> Self {
        self.criteria.insert(name.into(), criterion);
        self
    }

    /// Sets the alternatives.
    pub fn alternatives(mut self, names: Vec<impl Into<String>>) -> Self {
        self.alternatives = names.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Adds a constraint.
    pub fn constraint(mut self, constraint: DecisionConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Builds the scenario. Validation happens at normalization.
    pub fn build(self) -> Scenario {
        Scenario {
            id: self.id,
            name: self.name,
            description: self.description,
            criteria: self.criteria,
            alternatives: self.alternatives,
            constraints: self.constraints,
            created_at: Timestamp::now(),
        }
    }
}
