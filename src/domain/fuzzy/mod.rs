//! Fuzzy module - Fuzzy multi-criteria decision pipeline.
//!
//! `FuzzyDecisionEngine` runs the full pipeline; the stages are exposed
//! for callers that need only part of it:
//!
//! - `FuzzyScorer` - observed values to per-criterion fuzzy scores
//! - `Ranker` - aggregation, constraints, confidence and risk
//! - `ReasoningGenerator` - explanation trace
//! - `DecisionLayout` - layout hints for an external renderer

mod engine;
mod layout;
mod ranker;
mod reasoning;
mod scorer;
mod settings;

pub use engine::{DecisionResult, FuzzyDecisionEngine, OptimizationMetrics};
pub use layout::DecisionLayout;
pub use ranker::Ranker;
pub use reasoning::{
    AlternativeComparison, ConfidenceFactor, DecisionReasoning, FactorImpact, ReasoningGenerator,
    ReasoningStep, ReasoningStepKind,
};
pub use scorer::{AlternativeScores, FuzzyScorer};
pub use settings::FuzzySettings;
