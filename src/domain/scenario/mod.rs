//! Scenario module - The shared decision data model.
//!
//! - `Criterion` / `Direction` - weighted, uncertain criteria
//! - `FuzzySet` / `LinguisticTerm` - membership functions and their generator
//! - `Scenario` / `DecisionConstraint` - the decision problem
//! - `ScenarioNormalizer` - validation and rescaling
//! - `AlternativeRanking` - ranking output shared by all pipelines

mod criterion;
mod fuzzy_set;
mod normalizer;
mod ranking;
mod scenario;

pub use criterion::{Criterion, Direction};
pub use fuzzy_set::{
    FuzzySet, FuzzySetGenerator, LinguisticTerm, MembershipFunction, DEFAULT_UNIVERSE,
};
pub use normalizer::ScenarioNormalizer;
pub use ranking::{
    score_separation, sort_by_score_desc, AlternativeRanking, RiskAssessment, RiskFactor,
};
pub use scenario::{
    ConstraintKind, ConstraintOperator, DecisionConstraint, Scenario, ScenarioBuilder,
    DEFAULT_SOFT_PENALTY,
};
