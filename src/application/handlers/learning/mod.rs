//! Learning handlers - Pattern analysis over decision history.

mod analyze_patterns;

pub use analyze_patterns::{AnalyzePatternsCommand, AnalyzePatternsError, AnalyzePatternsHandler};
