//! Decision handlers - Ranking scenarios with the fuzzy and matrix methods.

mod evaluate_scenario;

pub use evaluate_scenario::{
    DecisionMethod, EvaluateScenarioCommand, EvaluateScenarioError, EvaluateScenarioHandler,
    EvaluateScenarioResult,
};
