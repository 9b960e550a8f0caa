//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the decision engine.

mod errors;
mod hashing;
mod ids;
mod timestamp;
mod unit_interval;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use hashing::stable_hash;
pub use ids::{PatternId, ProblemId};
pub use timestamp::Timestamp;
pub use unit_interval::{clamp_unit, UnitInterval};
