//! Pattern Recognition Engine - Batch analysis of decision history.
//!
//! One call runs preprocess -> detect -> filter -> metrics ->
//! recommendations. The engine keeps no state between calls.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::learning::recommendations;
use super::{
    BehavioralDetector, ContextualDetector, CorrelationDetector, DecisionHistoryRecord,
    IdentifiedPattern, LearningMetrics, PatternDetector, PatternLayout, PatternRecognitionConfig,
    PatternSettings, PerformanceDetector, Preprocessor, SequentialDetector, TemporalDetector,
};
use crate::domain::foundation::{DomainError, Timestamp};

/// Subject carried by errors about the request configuration.
const CONFIG_SUBJECT: &str = "pattern_recognition_config";

/// Result of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub identified_patterns: Vec<IdentifiedPattern>,
    pub learning_metrics: LearningMetrics,
    pub recommendations: Vec<String>,
    pub layout: PatternLayout,
    pub analyzed_at: Timestamp,
}

/// Keeps patterns with `confidence >= min_confidence` and
/// `frequency >= min_frequency`.
pub fn filter_significant(
    patterns: Vec<IdentifiedPattern>,
    min_confidence: f64,
    min_frequency: f64,
) -> Vec<IdentifiedPattern> {
    patterns
        .into_iter()
        .filter(|p| p.confidence >= min_confidence && p.frequency >= min_frequency)
        .collect()
}

pub struct PatternRecognitionEngine {
    settings: PatternSettings,
    detectors: Vec<Box<dyn PatternDetector>>,
}

impl PatternRecognitionEngine {
    /// Engine with every built-in detector.
    pub fn new(settings: PatternSettings) -> Self {
        Self {
            settings,
            detectors: vec![
                Box::new(TemporalDetector),
                Box::new(BehavioralDetector),
                Box::new(ContextualDetector),
                Box::new(CorrelationDetector),
                Box::new(SequentialDetector),
                Box::new(PerformanceDetector),
            ],
        }
    }

    /// Adds a detector. It runs whenever its type is requested, after the
    /// built-in ones.
    pub fn with_detector(mut self, detector: Box<dyn PatternDetector>) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn settings(&self) -> &PatternSettings {
        &self.settings
    }

    /// Analyzes `history` under `config`.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `config.min_confidence` is outside [0, 1]
    /// - Validation errors for the first malformed record, carrying its id
    pub fn analyze(
        &self,
        history: &[DecisionHistoryRecord],
        config: &PatternRecognitionConfig,
    ) -> Result<PatternAnalysis, DomainError> {
        let started = Instant::now();

        let min_confidence = config
            .min_confidence()
            .map_err(|e| DomainError::invalid_subject(CONFIG_SUBJECT, e))?;
        let reference = config.reference_time.unwrap_or_else(Timestamp::now);

        let prepared = Preprocessor::prepare(history, config, reference)?;

        let candidates: Vec<IdentifiedPattern> = self
            .detectors
            .iter()
            .filter(|d| config.includes(d.pattern_type()))
            .flat_map(|d| d.detect(&prepared, &self.settings))
            .collect();
        let candidate_count = candidates.len();

        let patterns = filter_significant(
            candidates,
            min_confidence.value(),
            self.settings.min_frequency,
        );

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let learning_metrics = LearningMetrics::compute(&patterns, prepared.len(), elapsed_ms);
        let recommendations = recommendations(
            &patterns,
            &learning_metrics,
            self.settings.max_recommendations,
        );
        let layout = PatternLayout::build(&patterns);

        debug!(
            records = prepared.len(),
            candidates = candidate_count,
            patterns = patterns.len(),
            learning_mode = ?config.learning_mode,
            goal = ?config.optimization_goal,
            elapsed_ms = elapsed_ms,
            "Pattern analysis completed"
        );

        Ok(PatternAnalysis {
            identified_patterns: patterns,
            learning_metrics,
            recommendations,
            layout,
            analyzed_at: Timestamp::now(),
        })
    }
}

impl Default for PatternRecognitionEngine {
    fn default() -> Self {
        Self::new(PatternSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::patterns::{NumericField, PatternType, PreparedHistory};
    use proptest::prelude::*;

    const HOUR_MS: i64 = 3_600_000;
    const DAY_MS: i64 = 24 * HOUR_MS;

    fn reference() -> Timestamp {
        Timestamp::from_unix_millis(1_000 * DAY_MS)
    }

    fn config() -> PatternRecognitionConfig {
        PatternRecognitionConfig::default().with_reference_time(reference())
    }

    /// One decision a day at 09:00 for 30 days, steady low risk.
    fn steady_history() -> Vec<DecisionHistoryRecord> {
        (0..30)
            .map(|day| {
                DecisionHistoryRecord::new(
                    format!("d-{}", day),
                    "vendor",
                    Timestamp::from_unix_millis((970 + day) * DAY_MS + 9 * HOUR_MS),
                )
                .with(NumericField::Risk, 0.1)
            })
            .collect()
    }

    struct FixedDetector(f64, f64);

    impl PatternDetector for FixedDetector {
        fn pattern_type(&self) -> PatternType {
            PatternType::Sequential
        }

        fn detect(&self, _: &PreparedHistory, _: &PatternSettings) -> Vec<IdentifiedPattern> {
            vec![IdentifiedPattern::new(PatternType::Sequential, "fixed", self.0, self.1)]
        }
    }

    // Pipeline Tests

    #[test]
    fn empty_history_yields_advice_only() {
        let analysis = PatternRecognitionEngine::default()
            .analyze(&[], &config())
            .unwrap();

        assert!(analysis.identified_patterns.is_empty());
        assert_eq!(analysis.learning_metrics.total_decisions, 0);
        assert_eq!(
            analysis.recommendations[0],
            "Increase decision data collection to enable pattern recognition"
        );
        assert!(analysis.layout.nodes.is_empty());
    }

    #[test]
    fn steady_history_yields_daily_cycle_and_risk_style() {
        let analysis = PatternRecognitionEngine::default()
            .analyze(&steady_history(), &config())
            .unwrap();

        let types: Vec<PatternType> = analysis
            .identified_patterns
            .iter()
            .map(|p| p.pattern_type)
            .collect();
        assert!(types.contains(&PatternType::Temporal));
        assert!(types.contains(&PatternType::Behavioral));
        assert_eq!(analysis.layout.nodes.len(), analysis.identified_patterns.len());
    }

    #[test]
    fn constant_fields_report_no_correlation() {
        let history: Vec<DecisionHistoryRecord> = (0..7)
            .map(|day| {
                DecisionHistoryRecord::new(
                    format!("c-{}", day),
                    "vendor",
                    Timestamp::from_unix_millis((990 + day) * DAY_MS),
                )
                .with(NumericField::Confidence, 0.3)
                .with(NumericField::Risk, 0.6)
            })
            .collect();

        let analysis = PatternRecognitionEngine::default()
            .analyze(&history, &config())
            .unwrap();

        assert_eq!(analysis.learning_metrics.total_decisions, 7);
        assert!(analysis
            .identified_patterns
            .iter()
            .all(|p| p.pattern_type != PatternType::Correlation));
    }

    #[test]
    fn unrequested_types_are_skipped() {
        let config = config().with_pattern_types(vec![PatternType::Behavioral]);

        let analysis = PatternRecognitionEngine::default()
            .analyze(&steady_history(), &config)
            .unwrap();

        assert!(analysis
            .identified_patterns
            .iter()
            .all(|p| p.pattern_type == PatternType::Behavioral));
    }

    #[test]
    fn custom_detector_runs_when_requested() {
        let engine = PatternRecognitionEngine::default()
            .with_detector(Box::new(FixedDetector(0.9, 4.0)));

        let analysis = engine.analyze(&[], &config()).unwrap();

        assert_eq!(analysis.identified_patterns.len(), 1);
        assert_eq!(analysis.identified_patterns[0].description, "fixed");
    }

    #[test]
    fn weak_or_rare_candidates_are_dropped() {
        let engine = PatternRecognitionEngine::default()
            .with_detector(Box::new(FixedDetector(0.5, 10.0)))
            .with_detector(Box::new(FixedDetector(0.9, 2.0)));

        let analysis = engine.analyze(&[], &config()).unwrap();

        assert!(analysis.identified_patterns.is_empty());
    }

    // Error Tests

    #[test]
    fn min_confidence_outside_unit_interval_is_rejected() {
        let err = PatternRecognitionEngine::default()
            .analyze(&[], &config().with_min_confidence(1.5))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::OutOfRange);
        assert_eq!(err.subject_id(), Some(CONFIG_SUBJECT));
    }

    #[test]
    fn malformed_record_is_rejected_with_its_id() {
        let history = vec![DecisionHistoryRecord::new("x-1", "vendor", reference())
            .with(NumericField::Score, f64::NAN)];

        let err = PatternRecognitionEngine::default()
            .analyze(&history, &config())
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.subject_id(), Some("x-1"));
    }

    // Filter Property Tests

    proptest! {
        #[test]
        fn filtered_patterns_meet_both_thresholds(
            entries in prop::collection::vec((0.0f64..=1.0, 0.0f64..20.0), 0..20),
            min_confidence in 0.0f64..=1.0,
            min_frequency in 0.0f64..10.0,
        ) {
            let patterns: Vec<IdentifiedPattern> = entries
                .iter()
                .map(|(c, f)| IdentifiedPattern::new(PatternType::Temporal, "p", *c, *f))
                .collect();
            let expected = entries
                .iter()
                .filter(|(c, f)| *c >= min_confidence && *f >= min_frequency)
                .count();

            let kept = filter_significant(patterns, min_confidence, min_frequency);

            prop_assert_eq!(kept.len(), expected);
            for p in &kept {
                prop_assert!(p.confidence >= min_confidence);
                prop_assert!(p.frequency >= min_frequency);
            }
        }
    }
}
