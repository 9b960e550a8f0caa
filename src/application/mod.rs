//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    // Decision handlers
    DecisionMethod, EvaluateScenarioCommand, EvaluateScenarioError, EvaluateScenarioHandler,
    EvaluateScenarioResult,
    // Learning handlers
    AnalyzePatternsCommand, AnalyzePatternsError, AnalyzePatternsHandler,
};
