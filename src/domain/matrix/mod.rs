//! Matrix module - Classical multi-criteria ranking over observed values.
//!
//! - `Topsis` - closeness to the ideal solution
//! - `Ahp` - pairwise comparisons and geometric-mean priorities
//! - `SensitivityAnalyzer` - ranking stability under weight changes
//! - `WeightOptimizer` - weight search against a goal
//!
//! All methods share one `DecisionMatrix` built through a `ValueProvider`.

mod ahp;
mod decision_matrix;
mod optimizer;
mod problem;
mod sensitivity;
mod settings;
mod topsis;

pub use ahp::{Ahp, AhpOutcome, PairwiseMatrix};
pub use decision_matrix::DecisionMatrix;
pub use optimizer::{
    project_onto_simplex, relative_improvement, OptimizationGoal, WeightOptimization,
    WeightOptimizer,
};
pub use problem::{
    ConstraintRelation, Convergence, Objective, ObjectiveSense, OptimizationAlgorithm,
    OptimizationProblem, OptimizationResult, Solution, SolverParameters, SolverPerformance,
    SumConstraint, Variable,
};
pub use sensitivity::{
    count_ranking_changes, robustness, SensitivityAnalyzer, SensitivityResult,
    SensitivityVariation,
};
pub use settings::MatrixSettings;
pub use topsis::{Closeness, Topsis};
