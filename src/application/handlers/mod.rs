//! Application handlers.
//!
//! Synchronous command handlers that wire a value provider and settings to
//! the domain services.

pub mod decision;
pub mod learning;

pub use decision::{
    DecisionMethod, EvaluateScenarioCommand, EvaluateScenarioError, EvaluateScenarioHandler,
    EvaluateScenarioResult,
};
pub use learning::{AnalyzePatternsCommand, AnalyzePatternsError, AnalyzePatternsHandler};
