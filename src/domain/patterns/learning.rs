//! Learning metrics and recommendations.
//!
//! Diagnostic figures derived from one analysis call. Nothing here is
//! carried between calls.

use serde::{Deserialize, Serialize};

use super::stats::mean;
use super::{IdentifiedPattern, PatternType};
use crate::domain::foundation::clamp_unit;

/// Accuracy below this asks for better decision quality.
const ACCURACY_FLOOR: f64 = 0.7;
/// Learning rate below this asks for more varied decisions.
const LEARNING_RATE_FLOOR: f64 = 0.3;
/// Pattern count at which memory utilisation saturates.
const MEMORY_CAPACITY: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningMetrics {
    /// Records that survived preprocessing.
    pub total_decisions: usize,
    /// Mean confidence of the reported patterns.
    pub decision_accuracy: f64,
    /// Patterns per record, clamped to [0, 1].
    pub learning_rate: f64,
    /// Inverse processing latency, clamped to [0, 1].
    pub adaptation_speed: f64,
    pub pattern_recognition_accuracy: f64,
    /// Mean predictive value of the reported patterns.
    pub optimization_efficiency: f64,
    pub memory_utilization: f64,
    /// Number of reported patterns.
    pub knowledge_base: usize,
}

impl LearningMetrics {
    pub fn compute(
        patterns: &[IdentifiedPattern],
        total_decisions: usize,
        elapsed_ms: f64,
    ) -> Self {
        let confidences: Vec<f64> = patterns.iter().map(|p| p.confidence).collect();
        let predictive: Vec<f64> = patterns.iter().map(|p| p.predictive_value).collect();
        let accuracy = mean(&confidences);
        let count = patterns.len() as f64;

        Self {
            total_decisions,
            decision_accuracy: accuracy,
            learning_rate: clamp_unit(count / total_decisions.max(1) as f64),
            adaptation_speed: adaptation_speed(elapsed_ms),
            pattern_recognition_accuracy: accuracy,
            optimization_efficiency: mean(&predictive),
            memory_utilization: clamp_unit(count / MEMORY_CAPACITY),
            knowledge_base: patterns.len(),
        }
    }
}

/// `clamp(1000 / elapsed_ms)`; a call too fast to measure counts as 1.
pub fn adaptation_speed(elapsed_ms: f64) -> f64 {
    if elapsed_ms <= 0.0 {
        1.0
    } else {
        clamp_unit(1000.0 / elapsed_ms)
    }
}

/// Plain-language suggestions, at most `limit`.
pub fn recommendations(
    patterns: &[IdentifiedPattern],
    metrics: &LearningMetrics,
    limit: usize,
) -> Vec<String> {
    let found = |t: PatternType| patterns.iter().any(|p| p.pattern_type == t);

    let candidates = [
        (
            patterns.is_empty(),
            "Increase decision data collection to enable pattern recognition",
        ),
        (
            metrics.decision_accuracy < ACCURACY_FLOOR,
            "Focus on improving decision quality and consistency",
        ),
        (
            metrics.learning_rate < LEARNING_RATE_FLOOR,
            "Increase diversity in decision scenarios to enhance learning",
        ),
        (
            found(PatternType::Temporal),
            "Leverage identified temporal patterns for better timing of decisions",
        ),
        (
            found(PatternType::Behavioral),
            "Use behavioral patterns to optimize decision-making style",
        ),
        (
            found(PatternType::Correlation),
            "Apply correlation insights to predict decision outcomes",
        ),
    ];

    candidates
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .take(limit)
        .collect()
}
