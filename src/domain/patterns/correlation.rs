//! Correlation detection - Pairwise Pearson correlation between fields.

use serde_json::json;

use super::stats::{heuristic_p_value, min_max, pearson};
use super::{
    IdentifiedPattern, NumericField, PatternDetector, PatternSettings, PatternType,
    PatternVariable, PreparedHistory,
};
use crate::domain::foundation::clamp_unit;

const FIELDS: [NumericField; 5] = [
    NumericField::Score,
    NumericField::Confidence,
    NumericField::Risk,
    NumericField::Duration,
    NumericField::Impact,
];

const MIN_PAIRS: usize = 3;

/// |r| above this is described as strong.
const STRONG_CORRELATION: f64 = 0.7;

const PREDICTIVE_FACTOR: f64 = 0.9;

/// Correlation between two fields over records carrying both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCorrelation {
    pub coefficient: f64,
    /// Heuristic proxy, not a hypothesis test.
    pub p_value: f64,
    pub sample_size: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl FieldCorrelation {
    /// `None` with fewer than three joint samples.
    pub fn measure(history: &PreparedHistory, x: NumericField, y: NumericField) -> Option<Self> {
        let pairs = history.pairs(x, y);
        if pairs.len() < MIN_PAIRS {
            return None;
        }
        let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let coefficient = pearson(&pairs);

        Some(Self {
            coefficient,
            p_value: heuristic_p_value(coefficient),
            sample_size: pairs.len(),
            x_range: min_max(&xs).unwrap_or((0.0, 1.0)),
            y_range: min_max(&ys).unwrap_or((0.0, 1.0)),
        })
    }
}

pub struct CorrelationDetector;

impl CorrelationDetector {
    fn pattern(
        history: &PreparedHistory,
        x: NumericField,
        y: NumericField,
        c: FieldCorrelation,
    ) -> IdentifiedPattern {
        let strength = c.coefficient.abs();
        let degree = if strength > STRONG_CORRELATION { "Strong" } else { "Moderate" };
        let sign = if c.coefficient > 0.0 { "positive" } else { "negative" };

        IdentifiedPattern::new(
            PatternType::Correlation,
            format!("{} {} correlation between {} and {}", degree, sign, x, y),
            strength,
            c.sample_size as f64,
        )
        .with_context(
            history
                .context()
                .with_factor("correlated_variables", json!([x.as_str(), y.as_str()]))
                .with_metric("correlation", c.coefficient)
                .with_metric("p_value", c.p_value),
        )
        .with_predictive_value(clamp_unit(strength * PREDICTIVE_FACTOR))
        .with_variable(
            PatternVariable::numeric(x.as_str(), strength, c.coefficient)
                .with_range(c.x_range.0, c.x_range.1),
        )
        .with_variable(
            PatternVariable::numeric(y.as_str(), strength, c.coefficient)
                .with_range(c.y_range.0, c.y_range.1),
        )
    }
}

impl PatternDetector for CorrelationDetector {
    fn pattern_type(&self) -> PatternType {
        PatternType::Correlation
    }

    fn detect(
        &self,
        history: &PreparedHistory,
        settings: &PatternSettings,
    ) -> Vec<IdentifiedPattern> {
        let mut patterns = Vec::new();
        for (i, &x) in FIELDS.iter().enumerate() {
            for &y in &FIELDS[i + 1..] {
                let Some(c) = FieldCorrelation::measure(history, x, y) else {
                    continue;
                };
                if c.coefficient.abs() >= settings.correlation_threshold {
                    patterns.push(Self::pattern(history, x, y, c));
                }
            }
        }
        patterns
    }
}
