//! Optimization problem and result types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ProblemId, Timestamp};
use crate::domain::scenario::ConstraintKind;

/// Whether an objective is to be maximized or minimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveSense {
    Maximize,
    Minimize,
}

/// Relation a constraint enforces between the variable sum and its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintRelation {
    /// Sum equals target within tolerance.
    Equality,
    /// Sum does not exceed target by more than tolerance.
    Inequality,
}

/// Solver used to produce a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationAlgorithm {
    /// Projected coordinate search over the weight simplex.
    CoordinateSearch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub initial_value: f64,
}

impl Variable {
    pub fn new(name: impl Into<String>, lower_bound: f64, upper_bound: f64, initial: f64) -> Self {
        Self {
            name: name.into(),
            lower_bound,
            upper_bound,
            initial_value: initial,
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower_bound, self.upper_bound)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub name: String,
    pub sense: ObjectiveSense,
    pub weight: f64,
    pub priority: u32,
}

/// Linear constraint on the sum of all variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumConstraint {
    pub name: String,
    pub relation: ConstraintRelation,
    pub kind: ConstraintKind,
    pub target: f64,
    pub tolerance: f64,
}

impl SumConstraint {
    /// Describes the violation, or `None` if `values` satisfy the constraint.
    pub fn violation(&self, values: &BTreeMap<String, f64>) -> Option<String> {
        let sum: f64 = values.values().sum();
        let violated = match self.relation {
            ConstraintRelation::Equality => (sum - self.target).abs() > self.tolerance,
            ConstraintRelation::Inequality => sum > self.target + self.tolerance,
        };
        violated.then(|| format!("{}: sum {:.6} vs target {}", self.name, sum, self.target))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverParameters {
    pub max_iterations: u32,
    pub tolerance: f64,
    pub initial_step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationProblem {
    pub id: ProblemId,
    pub name: String,
    pub description: String,
    pub variables: Vec<Variable>,
    pub objectives: Vec<Objective>,
    pub constraints: Vec<SumConstraint>,
    pub algorithm: OptimizationAlgorithm,
    pub parameters: SolverParameters,
}

impl OptimizationProblem {
    /// Initial values keyed by variable name.
    pub fn initial_values(&self) -> BTreeMap<String, f64> {
        self.variables
            .iter()
            .map(|v| (v.name.clone(), v.initial_value))
            .collect()
    }

    /// Violations of every constraint by `values`.
    pub fn violations(&self, values: &BTreeMap<String, f64>) -> Vec<String> {
        let mut violations: Vec<String> = self
            .constraints
            .iter()
            .filter_map(|c| c.violation(values))
            .collect();
        violations.extend(self.variables.iter().filter_map(|v| {
            let value = values.get(&v.name).copied().unwrap_or(v.initial_value);
            (value < v.lower_bound || value > v.upper_bound).then(|| {
                format!(
                    "{}: {:.6} outside [{}, {}]",
                    v.name, value, v.lower_bound, v.upper_bound
                )
            })
        }));
        violations
    }

    /// True when no hard constraint or bound is violated.
    pub fn is_feasible(&self, values: &BTreeMap<String, f64>) -> bool {
        let hard_ok = self
            .constraints
            .iter()
            .filter(|c| c.kind == ConstraintKind::Hard)
            .all(|c| c.violation(values).is_none());
        let bounds_ok = self.variables.iter().all(|v| {
            values
                .get(&v.name)
                .map_or(true, |x| *x >= v.lower_bound && *x <= v.upper_bound)
        });
        hard_ok && bounds_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub variable_values: BTreeMap<String, f64>,
    pub objective_values: BTreeMap<String, f64>,
    pub feasible: bool,
    pub violations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverPerformance {
    pub iterations: u32,
    pub evaluations: u32,
    pub execution_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    /// Best objective value after each sweep.
    pub history: Vec<f64>,
    /// Sweep at which the search stopped improving, if it did.
    pub convergence_point: Option<u32>,
    /// Sweeps that brought no improvement.
    pub stagnation_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub problem_id: ProblemId,
    pub solution: Solution,
    pub performance: SolverPerformance,
    pub convergence: Convergence,
    pub timestamp: Timestamp,
}
