//! Behavioral detection - Decision-making styles.
//!
//! Each style looks at one field (risk, duration, confidence), classifies
//! its mean against two thresholds and scores how consistently the agent
//! stays there.

use super::stats::{mean, variance};
use super::{
    IdentifiedPattern, NumericField, PatternDetector, PatternSettings, PatternType,
    PatternVariable, PreparedHistory,
};
use crate::domain::foundation::clamp_unit;

const MIN_SAMPLES: usize = 5;

/// Variance at which consistency reaches 0.
const MAX_VARIANCE: f64 = 0.25;

/// One dimension of decision style.
struct StyleProfile {
    field: NumericField,
    /// Name of the reported variable.
    variable: &'static str,
    low_threshold: f64,
    high_threshold: f64,
    low: &'static str,
    middle: &'static str,
    high: &'static str,
    predictive_factor: f64,
    /// Correlation of the variable with its mean.
    inverse: bool,
}

const PROFILES: [StyleProfile; 3] = [
    StyleProfile {
        field: NumericField::Risk,
        variable: "risk_tolerance",
        low_threshold: 0.3,
        high_threshold: 0.7,
        low: "risk_averse",
        middle: "moderate",
        high: "risk_taking",
        predictive_factor: 0.8,
        inverse: false,
    },
    StyleProfile {
        field: NumericField::Duration,
        variable: "decision_speed",
        low_threshold: 0.3,
        high_threshold: 0.7,
        low: "quick",
        middle: "moderate",
        high: "deliberate",
        predictive_factor: 0.7,
        inverse: true,
    },
    StyleProfile {
        field: NumericField::Confidence,
        variable: "confidence_level",
        low_threshold: 0.4,
        high_threshold: 0.8,
        low: "cautious",
        middle: "balanced",
        high: "confident",
        predictive_factor: 0.75,
        inverse: false,
    },
];

impl StyleProfile {
    fn classify(&self, average: f64) -> &'static str {
        if average < self.low_threshold {
            self.low
        } else if average > self.high_threshold {
            self.high
        } else {
            self.middle
        }
    }

    fn description(&self, style: &str) -> String {
        let style = style.replace('_', " ");
        match self.field {
            NumericField::Risk => format!("Agent shows {} risk tolerance pattern", style),
            NumericField::Duration => {
                format!("Agent shows {} decision-making speed pattern", style)
            }
            _ => format!("Agent shows {} confidence pattern in decisions", style),
        }
    }
}

/// `1 - clamp(variance, 0, 0.25) / 0.25`.
pub fn consistency(variance: f64) -> f64 {
    1.0 - variance.clamp(0.0, MAX_VARIANCE) / MAX_VARIANCE
}

/// Values a style is judged on: raw when every raw value already lies in
/// [0, 1], otherwise min-max scaled.
fn style_values(history: &PreparedHistory, field: NumericField) -> Vec<f64> {
    let raw = history.raw_values(field);
    if raw.iter().all(|v| (0.0..=1.0).contains(v)) {
        raw
    } else {
        history.values(field)
    }
}

pub struct BehavioralDetector;

impl BehavioralDetector {
    fn style(
        history: &PreparedHistory,
        profile: &StyleProfile,
        settings: &PatternSettings,
    ) -> Option<IdentifiedPattern> {
        let values = style_values(history, profile.field);
        if values.len() < MIN_SAMPLES {
            return None;
        }

        let average = mean(&values);
        let spread = variance(&values);
        let consistency = consistency(spread);
        if consistency <= settings.consistency_threshold {
            return None;
        }

        let style = profile.classify(average);
        let correlation = if profile.inverse { 1.0 - average } else { average };

        Some(
            IdentifiedPattern::new(
                PatternType::Behavioral,
                profile.description(style),
                consistency,
                values.len() as f64,
            )
            .with_context(
                history
                    .context()
                    .with_factor("decision_style", style)
                    .with_factor("dimension", profile.variable)
                    .with_metric("average", average)
                    .with_metric("variance", spread)
                    .with_metric("consistency", consistency),
            )
            .with_predictive_value(clamp_unit(consistency * profile.predictive_factor))
            .with_variable(
                PatternVariable::numeric(profile.variable, consistency, correlation)
                    .with_range(0.0, 1.0),
            ),
        )
    }
}

impl PatternDetector for BehavioralDetector {
    fn pattern_type(&self) -> PatternType {
        PatternType::Behavioral
    }

    fn detect(
        &self,
        history: &PreparedHistory,
        settings: &PatternSettings,
    ) -> Vec<IdentifiedPattern> {
        PROFILES
            .iter()
            .filter_map(|profile| Self::style(history, profile, settings))
            .collect()
    }
}
