//! Decision history records - Caller-supplied input to pattern analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, Timestamp, ValidationError};

/// Numeric field tracked on a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Score,
    Confidence,
    Risk,
    Duration,
    Impact,
    Cost,
}

impl NumericField {
    pub const ALL: [NumericField; 6] = [
        Self::Score,
        Self::Confidence,
        Self::Risk,
        Self::Duration,
        Self::Impact,
        Self::Cost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Confidence => "confidence",
            Self::Risk => "risk",
            Self::Duration => "duration",
            Self::Impact => "impact",
            Self::Cost => "cost",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional numeric measurements of one decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl NumericFields {
    pub fn get(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Score => self.score,
            NumericField::Confidence => self.confidence,
            NumericField::Risk => self.risk,
            NumericField::Duration => self.duration,
            NumericField::Impact => self.impact,
            NumericField::Cost => self.cost,
        }
    }

    pub fn set(&mut self, field: NumericField, value: Option<f64>) {
        let slot = match field {
            NumericField::Score => &mut self.score,
            NumericField::Confidence => &mut self.confidence,
            NumericField::Risk => &mut self.risk,
            NumericField::Duration => &mut self.duration,
            NumericField::Impact => &mut self.impact,
            NumericField::Cost => &mut self.cost,
        };
        *slot = value;
    }
}

/// One past decision. Read-only to the pattern engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionHistoryRecord {
    pub id: String,
    pub category: String,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub numeric_fields: NumericFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl DecisionHistoryRecord {
    pub fn new(id: impl Into<String>, category: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            timestamp,
            numeric_fields: NumericFields::default(),
            success: None,
        }
    }

    /// Sets a numeric field.
    pub fn with(mut self, field: NumericField, value: f64) -> Self {
        self.numeric_fields.set(field, Some(value));
        self
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    pub fn value(&self, field: NumericField) -> Option<f64> {
        self.numeric_fields.get(field)
    }

    /// Rejects a blank id and non-finite measurements.
    ///
    /// # Errors
    ///
    /// The error carries this record's id.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::invalid_subject("", ValidationError::empty_field("id")));
        }
        for field in NumericField::ALL {
            if self.value(field).is_some_and(|v| !v.is_finite()) {
                return Err(DomainError::invalid_subject(
                    &self.id,
                    ValidationError::non_finite(format!("numeric_fields.{}", field)),
                ));
            }
        }
        Ok(())
    }
}
