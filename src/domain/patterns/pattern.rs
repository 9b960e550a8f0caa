//! Identified patterns - What the detectors report.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::PatternType;
use crate::domain::foundation::{PatternId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Numeric,
    Categorical,
    Boolean,
    Temporal,
}

/// A variable that takes part in a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternVariable {
    pub name: String,
    pub kind: VariableKind,
    /// Importance within the pattern, in [0, 1].
    pub importance: f64,
    /// Correlation with the outcome, in [-1, 1].
    pub correlation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl PatternVariable {
    pub fn numeric(name: impl Into<String>, importance: f64, correlation: f64) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Numeric,
            importance,
            correlation,
            range: None,
            categories: Vec::new(),
        }
    }

    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.range = Some((low, high));
        self
    }
}

/// Where and under what conditions a pattern was observed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternContext {
    /// First and last timestamps of the analysed records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<(Timestamp, Timestamp)>,
    #[serde(default)]
    pub decision_categories: Vec<String>,
    #[serde(default)]
    pub environmental_factors: BTreeMap<String, Value>,
    #[serde(default)]
    pub performance_metrics: BTreeMap<String, f64>,
}

impl PatternContext {
    pub fn with_factor(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.environmental_factors.insert(key.into(), value.into());
        self
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.performance_metrics.insert(key.into(), value);
        self
    }
}

/// A regularity found in decision history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedPattern {
    pub id: PatternId,
    pub pattern_type: PatternType,
    pub description: String,
    /// Strength of evidence, in [0, 1].
    pub confidence: f64,
    /// How often the pattern occurs. Fractional for weekly cycles.
    pub frequency: f64,
    pub context: PatternContext,
    pub predictive_value: f64,
    pub variables: Vec<PatternVariable>,
}

impl IdentifiedPattern {
    pub fn new(
        pattern_type: PatternType,
        description: impl Into<String>,
        confidence: f64,
        frequency: f64,
    ) -> Self {
        Self {
            id: PatternId::new(),
            pattern_type,
            description: description.into(),
            confidence,
            frequency,
            context: PatternContext::default(),
            predictive_value: 0.0,
            variables: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: PatternContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_predictive_value(mut self, predictive_value: f64) -> Self {
        self.predictive_value = predictive_value;
        self
    }

    pub fn with_variable(mut self, variable: PatternVariable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Text factor from the context, if present.
    pub fn factor(&self, key: &str) -> Option<&str> {
        self.context.environmental_factors.get(key)?.as_str()
    }

    pub fn metric(&self, key: &str) -> Option<f64> {
        self.context.performance_metrics.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_context_and_variables() {
        let pattern = IdentifiedPattern::new(PatternType::Behavioral, "steady", 0.9, 12.0)
            .with_context(
                PatternContext::default()
                    .with_factor("decision_style", "risk_averse")
                    .with_metric("average", 0.1),
            )
            .with_predictive_value(0.72)
            .with_variable(
                PatternVariable::numeric("risk_tolerance", 0.9, 0.1).with_range(0.0, 1.0),
            );

        assert_eq!(pattern.factor("decision_style"), Some("risk_averse"));
        assert_eq!(pattern.metric("average"), Some(0.1));
        assert_eq!(pattern.variables[0].range, Some((0.0, 1.0)));
    }

    #[test]
    fn serializes_type_in_snake_case() {
        let pattern = IdentifiedPattern::new(PatternType::Correlation, "r", 0.8, 5.0);
        let json = serde_json::to_value(&pattern).unwrap();

        assert_eq!(json["pattern_type"], "correlation");
        assert!(json["context"].get("time_range").is_none());
    }
}
