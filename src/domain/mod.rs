//! Domain layer containing the decision and learning logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `scenario` - Scenarios, criteria, fuzzy sets and normalization
//! - `fuzzy` - Fuzzy scoring, ranking and reasoning
//! - `matrix` - TOPSIS, AHP, sensitivity analysis and weight optimization
//! - `patterns` - Pattern recognition over decision history
//! - `layout` - 3-D layout hints shared by decision and pattern results

pub mod foundation;
pub mod fuzzy;
pub mod layout;
pub mod matrix;
pub mod patterns;
pub mod scenario;
