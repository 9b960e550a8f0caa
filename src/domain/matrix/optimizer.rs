//! Weight optimizer - Searches criterion weights that improve a goal.
//!
//! The problem is one variable per criterion weight, bounded to
//! `[min(0.01, 1/n), 1]`, with a hard equality constraint that the weights
//! sum to 1. The solver is a projected coordinate search: each sweep tries
//! a step up and down on every coordinate, projects the candidate back onto
//! the bounded simplex and keeps strict improvements. A sweep without
//! improvement halves the step; the search ends once the step falls below
//! the tolerance or the sweep budget is spent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;
use tracing::debug;

use super::{
    ConstraintRelation, Convergence, DecisionMatrix, MatrixSettings, Objective, ObjectiveSense,
    OptimizationAlgorithm, OptimizationProblem, OptimizationResult, Solution, SolverParameters,
    SolverPerformance, SumConstraint, Topsis, Variable,
};
use crate::domain::foundation::{DomainError, ProblemId, Timestamp};
use crate::domain::scenario::{
    score_separation, AlternativeRanking, ConstraintKind, Scenario, ScenarioNormalizer,
};
use crate::ports::ValueProvider;

const WEIGHT_FLOOR: f64 = 0.01;
const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Smallest gain counted as an improvement.
const IMPROVEMENT_EPSILON: f64 = 1e-12;

/// Floor of the old separation when computing relative improvement.
const SEPARATION_FLOOR: f64 = 0.1;

/// What the weight search optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationGoal {
    /// Widen the TOPSIS gap between the top two alternatives.
    #[default]
    MaximizeSeparation,
    /// Shift weight toward criteria with low uncertainty.
    MinimizeUncertainty,
    /// Pull weights toward an even split.
    BalanceCriteria,
}

impl OptimizationGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaximizeSeparation => "maximize_separation",
            Self::MinimizeUncertainty => "minimize_uncertainty",
            Self::BalanceCriteria => "balance_criteria",
        }
    }
}

impl fmt::Display for OptimizationGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optimized weights and the TOPSIS ranking they produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightOptimization {
    pub problem: OptimizationProblem,
    pub result: OptimizationResult,
    /// Keyed by criterion name.
    pub optimized_weights: BTreeMap<String, f64>,
    pub rankings: Vec<AlternativeRanking>,
    /// Relative change of the top-two separation, in [-1, 2].
    pub improvement: f64,
}

pub struct WeightOptimizer;

impl WeightOptimizer {
    /// Builds the optimization problem for a normalized scenario.
    pub fn formulate(
        scenario: &Scenario,
        goal: OptimizationGoal,
        settings: &MatrixSettings,
    ) -> OptimizationProblem {
        let n = scenario.criteria.len().max(1) as f64;
        let lower = WEIGHT_FLOOR.min(1.0 / n);

        OptimizationProblem {
            id: ProblemId::new(),
            name: format!("{} weight optimization", scenario.name),
            description: format!("Optimize criterion weights to {}", goal),
            variables: scenario
                .criteria
                .iter()
                .map(|(name, c)| Variable::new(variable_name(name), lower, 1.0, c.weight))
                .collect(),
            objectives: vec![Objective {
                name: goal.as_str().to_string(),
                sense: ObjectiveSense::Maximize,
                weight: 1.0,
                priority: 1,
            }],
            constraints: vec![SumConstraint {
                name: "weight_sum_constraint".to_string(),
                relation: ConstraintRelation::Equality,
                kind: ConstraintKind::Hard,
                target: 1.0,
                tolerance: WEIGHT_SUM_TOLERANCE,
            }],
            algorithm: OptimizationAlgorithm::CoordinateSearch,
            parameters: SolverParameters {
                max_iterations: settings.optimizer_max_iterations,
                tolerance: settings.optimizer_tolerance,
                initial_step: settings.optimizer_step,
            },
        }
    }

    /// Optimizes the scenario's weights for `goal` and re-ranks with TOPSIS.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the scenario is malformed.
    pub fn optimize(
        scenario: &Scenario,
        provider: &dyn ValueProvider,
        goal: OptimizationGoal,
        settings: &MatrixSettings,
    ) -> Result<WeightOptimization, DomainError> {
        let started = Instant::now();
        let normalized = ScenarioNormalizer::normalize(scenario)?;
        let matrix = DecisionMatrix::observe(&normalized, provider);
        let unit = matrix.vector_normalized();
        let uncertainties: Vec<f64> =
            normalized.criteria.values().map(|c| c.uncertainty).collect();
        let problem = Self::formulate(&normalized, goal, settings);

        let objective = |weights: &[f64]| -> f64 {
            match goal {
                OptimizationGoal::MaximizeSeparation => {
                    score_separation(&Topsis::rank_matrix(&matrix, &unit, weights))
                }
                OptimizationGoal::MinimizeUncertainty => -weights
                    .iter()
                    .zip(&uncertainties)
                    .map(|(w, u)| w * u)
                    .sum::<f64>(),
                OptimizationGoal::BalanceCriteria => {
                    let even = 1.0 / weights.len() as f64;
                    -weights.iter().map(|w| (w - even).powi(2)).sum::<f64>()
                }
            }
        };

        let search = coordinate_search(&problem, &matrix.weights, objective);

        let variable_values: BTreeMap<String, f64> = problem
            .variables
            .iter()
            .map(|v| v.name.clone())
            .zip(search.weights.iter().copied())
            .collect();
        let solution = Solution {
            objective_values: BTreeMap::from([(goal.as_str().to_string(), search.best)]),
            feasible: problem.is_feasible(&variable_values),
            violations: problem.violations(&variable_values),
            variable_values,
        };

        let old_separation =
            score_separation(&Topsis::rank_matrix(&matrix, &unit, &matrix.weights));
        let rankings = Topsis::rank_matrix(&matrix, &unit, &search.weights);
        let improvement = relative_improvement(old_separation, score_separation(&rankings));

        let result = OptimizationResult {
            problem_id: problem.id,
            solution,
            performance: SolverPerformance {
                iterations: search.iterations,
                evaluations: search.evaluations,
                execution_ms: started.elapsed().as_millis() as u64,
            },
            convergence: search.convergence,
            timestamp: Timestamp::now(),
        };

        debug!(
            scenario_id = %scenario.id,
            goal = %goal,
            iterations = result.performance.iterations,
            evaluations = result.performance.evaluations,
            improvement = improvement,
            "Weight optimization completed"
        );

        Ok(WeightOptimization {
            optimized_weights: matrix.criteria.iter().cloned().zip(search.weights).collect(),
            problem,
            result,
            rankings,
            improvement,
        })
    }
}

fn variable_name(criterion: &str) -> String {
    format!("weight_{}", criterion)
}

/// `(new - old) / max(old, 0.1)`, clamped to [-1, 2].
pub fn relative_improvement(old_separation: f64, new_separation: f64) -> f64 {
    ((new_separation - old_separation) / old_separation.max(SEPARATION_FLOOR)).clamp(-1.0, 2.0)
}

struct SearchOutcome {
    weights: Vec<f64>,
    best: f64,
    iterations: u32,
    evaluations: u32,
    convergence: Convergence,
}

fn coordinate_search(
    problem: &OptimizationProblem,
    initial: &[f64],
    objective: impl Fn(&[f64]) -> f64,
) -> SearchOutcome {
    let (lower, upper) = problem
        .variables
        .first()
        .map_or((WEIGHT_FLOOR, 1.0), |v| (v.lower_bound, v.upper_bound));
    let params = &problem.parameters;

    let mut weights = project_onto_simplex(initial, lower, upper);
    let mut best = objective(&weights);
    let mut evaluations = 1;
    let mut step = params.initial_step;
    let mut iterations = 0;
    let mut history = Vec::new();
    let mut stagnation_count = 0;
    let mut last_improvement = None;

    while iterations < params.max_iterations && step >= params.tolerance {
        iterations += 1;
        let mut improved = false;

        for i in 0..weights.len() {
            for delta in [step, -step] {
                let mut candidate = weights.clone();
                candidate[i] += delta;
                let candidate = project_onto_simplex(&candidate, lower, upper);
                let value = objective(&candidate);
                evaluations += 1;
                if value > best + IMPROVEMENT_EPSILON {
                    weights = candidate;
                    best = value;
                    improved = true;
                    break;
                }
            }
        }

        history.push(best);
        if improved {
            last_improvement = Some(iterations);
        } else {
            stagnation_count += 1;
            step /= 2.0;
        }
    }

    SearchOutcome {
        weights,
        best,
        iterations,
        evaluations,
        convergence: Convergence {
            history,
            convergence_point: last_improvement,
            stagnation_count,
        },
    }
}

/// Maps weights onto `{w : sum w = 1, lower <= w <= upper}`.
///
/// Free coordinates are rescaled to fill the remaining mass; any that land
/// outside the bounds are pinned and the rest rescaled again.
pub fn project_onto_simplex(weights: &[f64], lower: f64, upper: f64) -> Vec<f64> {
    let n = weights.len();
    let mut pinned: Vec<Option<f64>> = vec![None; n];

    loop {
        let pinned_sum: f64 = pinned.iter().flatten().sum();
        let free: Vec<usize> = (0..n).filter(|i| pinned[*i].is_none()).collect();
        if free.is_empty() {
            break;
        }

        let remaining = 1.0 - pinned_sum;
        let free_sum: f64 = free.iter().map(|i| weights[*i].max(0.0)).sum();
        let scaled = |i: usize| {
            if free_sum > 0.0 {
                weights[i].max(0.0) * remaining / free_sum
            } else {
                remaining / free.len() as f64
            }
        };

        let mut changed = false;
        for &i in &free {
            let value = scaled(i);
            if value < lower {
                pinned[i] = Some(lower);
                changed = true;
            } else if value > upper {
                pinned[i] = Some(upper);
                changed = true;
            }
        }

        if !changed {
            for &i in &free {
                pinned[i] = Some(scaled(i));
            }
            break;
        }
    }

    pinned.into_iter().map(|w| w.unwrap_or(lower)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TableValueProvider;
    use crate::domain::scenario::Criterion;

    fn close_call(cost_weight: f64, quality_weight: f64) -> (Scenario, TableValueProvider) {
        let scenario = Scenario::builder("s-1", "Close call")
            .criterion("cost", Criterion::minimize(0.5, cost_weight).with_uncertainty(0.9))
            .criterion("quality", Criterion::maximize(0.5, quality_weight).with_uncertainty(0.1))
            .alternatives(vec!["A", "B", "C"])
            .build();
        let provider = TableValueProvider::new()
            .with("A", "cost", 0.4)
            .with("A", "quality", 0.7)
            .with("B", "cost", 0.3)
            .with("B", "quality", 0.6)
            .with("C", "cost", 0.6)
            .with("C", "quality", 0.65);
        (scenario, provider)
    }

    fn sum(weights: &BTreeMap<String, f64>) -> f64 {
        weights.values().sum()
    }

    // Projection Tests

    #[test]
    fn projection_renormalizes() {
        let projected = project_onto_simplex(&[2.0, 2.0], 0.01, 1.0);
        assert!((projected[0] - 0.5).abs() < 1e-12);
        assert!((projected[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn projection_pins_small_weights_to_floor() {
        let projected = project_onto_simplex(&[1.0, 0.0, -0.3], 0.01, 1.0);

        assert_eq!(projected[1], 0.01);
        assert_eq!(projected[2], 0.01);
        assert!((projected.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn projection_of_all_zero_is_even() {
        let projected = project_onto_simplex(&[0.0, 0.0, 0.0, 0.0], 0.01, 1.0);
        assert!(projected.iter().all(|w| (w - 0.25).abs() < 1e-12));
    }

    // Improvement Tests

    #[test]
    fn improvement_is_relative_to_floored_separation() {
        assert!((relative_improvement(0.05, 0.15) - 1.0).abs() < 1e-12);
        assert!((relative_improvement(0.4, 0.5) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn improvement_is_clamped() {
        assert_eq!(relative_improvement(0.0, 0.9), 2.0);
        assert_eq!(relative_improvement(0.5, 0.0), -1.0);
    }

    // Formulation Tests

    #[test]
    fn formulation_has_one_variable_per_criterion() {
        let (scenario, _) = close_call(0.5, 0.5);

        let problem = WeightOptimizer::formulate(
            &scenario,
            OptimizationGoal::BalanceCriteria,
            &MatrixSettings::default(),
        );

        let names: Vec<&str> = problem.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["weight_cost", "weight_quality"]);
        assert_eq!(problem.variables[0].lower_bound, 0.01);
        assert_eq!(problem.objectives[0].name, "balance_criteria");
        assert_eq!(problem.constraints[0].name, "weight_sum_constraint");
        assert_eq!(problem.parameters.max_iterations, 100);
    }

    // Search Tests

    #[test]
    fn separation_never_decreases() {
        let (scenario, provider) = close_call(0.5, 0.5);

        let outcome = WeightOptimizer::optimize(
            &scenario,
            &provider,
            OptimizationGoal::MaximizeSeparation,
            &MatrixSettings::default(),
        )
        .unwrap();

        assert!(outcome.improvement >= 0.0);
        assert!((sum(&outcome.optimized_weights) - 1.0).abs() < 1e-9);
        assert!(outcome.result.solution.feasible);
        assert!(outcome.result.solution.violations.is_empty());
    }

    #[test]
    fn uncertainty_goal_favors_certain_criteria() {
        let (scenario, provider) = close_call(0.5, 0.5);

        let outcome = WeightOptimizer::optimize(
            &scenario,
            &provider,
            OptimizationGoal::MinimizeUncertainty,
            &MatrixSettings::default(),
        )
        .unwrap();

        assert!(outcome.optimized_weights["quality"] > outcome.optimized_weights["cost"]);
        assert!(outcome.optimized_weights["cost"] >= 0.01 - 1e-12);
    }

    #[test]
    fn balance_goal_converges_to_even_split() {
        let (scenario, provider) = close_call(0.8, 0.2);

        let outcome = WeightOptimizer::optimize(
            &scenario,
            &provider,
            OptimizationGoal::BalanceCriteria,
            &MatrixSettings::default(),
        )
        .unwrap();

        assert!((outcome.optimized_weights["cost"] - 0.5).abs() < 0.01);
        assert!(outcome.result.convergence.stagnation_count > 0);
        assert!(outcome.result.performance.evaluations > outcome.result.performance.iterations);
        assert_eq!(
            outcome.result.convergence.history.len() as u32,
            outcome.result.performance.iterations
        );
    }

    #[test]
    fn zero_iterations_returns_initial_weights() {
        let (scenario, provider) = close_call(0.8, 0.2);
        let settings = MatrixSettings {
            optimizer_max_iterations: 0,
            ..MatrixSettings::default()
        };

        let outcome = WeightOptimizer::optimize(
            &scenario,
            &provider,
            OptimizationGoal::BalanceCriteria,
            &settings,
        )
        .unwrap();

        assert!((outcome.optimized_weights["cost"] - 0.8).abs() < 1e-9);
        assert_eq!(outcome.improvement, 0.0);
        assert_eq!(outcome.result.convergence.convergence_point, None);
    }
}
