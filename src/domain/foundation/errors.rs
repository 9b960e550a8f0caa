//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur while validating scenario and record inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' must be a finite number")]
    NonFinite { field: String },

    #[error("Field '{field}' contains duplicate entry '{value}'")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a non-finite number validation error.
    pub fn non_finite(field: impl Into<String>) -> Self {
        ValidationError::NonFinite { field: field.into() }
    }

    /// Creates a duplicate entry validation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the error code matching this validation failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ValidationError::NonFinite { .. } => ErrorCode::NonFiniteValue,
            ValidationError::Duplicate { .. } => ErrorCode::DuplicateEntry,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,
    NonFiniteValue,
    DuplicateEntry,
    ZeroTotalWeight,
    UnknownCriterion,

    // Computation errors
    DegenerateComputation,

    // Configuration errors
    UnknownTimeframe,
    InvalidConfiguration,

    // Infrastructure errors
    InternalError,
}

impl ErrorCode {
    /// Returns true for codes raised while validating inputs.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorCode::ValidationFailed
                | ErrorCode::EmptyField
                | ErrorCode::OutOfRange
                | ErrorCode::InvalidFormat
                | ErrorCode::NonFiniteValue
                | ErrorCode::DuplicateEntry
                | ErrorCode::ZeroTotalWeight
                | ErrorCode::UnknownCriterion
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::NonFiniteValue => "NON_FINITE_VALUE",
            ErrorCode::DuplicateEntry => "DUPLICATE_ENTRY",
            ErrorCode::ZeroTotalWeight => "ZERO_TOTAL_WEIGHT",
            ErrorCode::UnknownCriterion => "UNKNOWN_CRITERION",
            ErrorCode::DegenerateComputation => "DEGENERATE_COMPUTATION",
            ErrorCode::UnknownTimeframe => "UNKNOWN_TIMEFRAME",
            ErrorCode::InvalidConfiguration => "INVALID_CONFIGURATION",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Errors raised for a scenario or history record carry its identifier
/// under the `subject_id` detail key.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Wraps a field-level validation error raised for a subject.
    pub fn invalid_subject(subject_id: impl Into<String>, err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NonFinite { field }
            | ValidationError::Duplicate { field, .. } => field.clone(),
        };
        Self::new(err.code(), err.to_string())
            .with_detail("field", field)
            .with_subject(subject_id)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Tags the error with the scenario or record identifier it concerns.
    pub fn with_subject(self, subject_id: impl Into<String>) -> Self {
        self.with_detail("subject_id", subject_id)
    }

    /// Returns the scenario or record identifier, if tagged.
    pub fn subject_id(&self) -> Option<&str> {
        self.details.get("subject_id").map(String::as_str)
    }

    /// Returns true if this error was raised while validating inputs.
    pub fn is_validation(&self) -> bool {
        self.code.is_validation()
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
