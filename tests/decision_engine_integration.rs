//! Integration tests for the public decision and learning API.
//!
//! These tests drive the crate the way a hosting runtime would:
//! 1. Build a scenario, rank it with every method through the handler
//! 2. Reject malformed scenarios before any computation
//! 3. Analyze decision history for behavioral and correlation patterns

use std::sync::Arc;

use fuzzy_decision_engine::adapters::TableValueProvider;
use fuzzy_decision_engine::application::{
    AnalyzePatternsCommand, AnalyzePatternsHandler, DecisionMethod, EvaluateScenarioCommand,
    EvaluateScenarioError, EvaluateScenarioHandler,
};
use fuzzy_decision_engine::config::AppConfig;
use fuzzy_decision_engine::domain::foundation::{ErrorCode, Timestamp};
use fuzzy_decision_engine::domain::fuzzy::FuzzyDecisionEngine;
use fuzzy_decision_engine::domain::matrix::{OptimizationGoal, Topsis};
use fuzzy_decision_engine::domain::patterns::{
    DecisionHistoryRecord, NumericField, PatternRecognitionConfig, PatternRecognitionEngine,
    PatternType,
};
use fuzzy_decision_engine::domain::scenario::{Criterion, Scenario, ScenarioNormalizer};

// =============================================================================
// Test Infrastructure
// =============================================================================

const DAY_MS: i64 = 86_400_000;

fn vendor_scenario() -> Scenario {
    Scenario::builder("vendor-selection", "Vendor selection")
        .criterion("cost", Criterion::minimize(0.5, 0.5))
        .criterion("quality", Criterion::maximize(0.5, 0.5))
        .alternatives(vec!["A", "B"])
        .build()
}

fn vendor_observations() -> TableValueProvider {
    TableValueProvider::new()
        .with("A", "cost", 0.2)
        .with("A", "quality", 0.8)
        .with("B", "cost", 0.8)
        .with("B", "quality", 0.2)
}

fn reference_time() -> Timestamp {
    Timestamp::from_unix_millis(20_000 * DAY_MS)
}

fn analysis_config() -> PatternRecognitionConfig {
    PatternRecognitionConfig::default().with_reference_time(reference_time())
}

// =============================================================================
// Scenario Ranking
// =============================================================================

#[test]
fn cheaper_better_vendor_ranks_first() {
    let provider = vendor_observations();

    let result = FuzzyDecisionEngine::new(&provider, AppConfig::default().fuzzy)
        .execute(&vendor_scenario())
        .unwrap();

    assert_eq!(result.winner().unwrap().alternative, "A");
    assert!(result.ranked_alternatives[0].score > result.ranked_alternatives[1].score);
    assert!(result.layout.is_some());
}

#[test]
fn topsis_places_dominant_vendor_at_ideal() {
    let rankings = Topsis::rank(&vendor_scenario(), &vendor_observations()).unwrap();

    assert_eq!(rankings[0].alternative, "A");
    assert!((rankings[0].score - 1.0).abs() < 1e-9);
    assert!(rankings[1].score.abs() < 1e-9);
}

#[test]
fn handler_agrees_across_methods() {
    let config = AppConfig::default();
    let handler = EvaluateScenarioHandler::new(
        Arc::new(vendor_observations()),
        config.fuzzy,
        config.matrix,
    );

    for method in [
        DecisionMethod::Fuzzy,
        DecisionMethod::Topsis,
        DecisionMethod::Ahp { comparisons: None },
        DecisionMethod::Sensitivity,
        DecisionMethod::OptimizeWeights {
            goal: OptimizationGoal::MinimizeUncertainty,
        },
    ] {
        let result = handler
            .handle(EvaluateScenarioCommand {
                scenario: vendor_scenario(),
                method,
            })
            .unwrap();
        assert_eq!(result.winner(), Some("A"));
    }
}

#[test]
fn normalized_weights_sum_to_one() {
    let scenario = Scenario::builder("s", "Uneven")
        .criterion("a", Criterion::maximize(0.4, 3.0))
        .criterion("b", Criterion::minimize(0.6, 1.0))
        .alternatives(vec!["x"])
        .build();

    let normalized = ScenarioNormalizer::normalize(&scenario).unwrap();

    let total: f64 = normalized.criteria.values().map(|c| c.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(ScenarioNormalizer::normalize(&normalized).unwrap(), normalized);
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn empty_alternatives_fail_validation() {
    let scenario = Scenario::builder("no-alternatives", "Nothing to choose")
        .criterion("cost", Criterion::minimize(0.5, 1.0))
        .build();

    let err = ScenarioNormalizer::normalize(&scenario).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.code, ErrorCode::EmptyField);
    assert_eq!(err.subject_id(), Some("no-alternatives"));
}

#[test]
fn handler_reports_invalid_scenario_as_input_error() {
    let handler = EvaluateScenarioHandler::new(
        Arc::new(vendor_observations()),
        Default::default(),
        Default::default(),
    );
    let scenario = Scenario::builder("no-alternatives", "Nothing to choose")
        .criterion("cost", Criterion::minimize(0.5, 1.0))
        .build();

    let err = handler
        .handle(EvaluateScenarioCommand {
            scenario,
            method: DecisionMethod::Topsis,
        })
        .unwrap_err();

    assert!(matches!(err, EvaluateScenarioError::InvalidInput(_)));
}

// =============================================================================
// Pattern Analysis
// =============================================================================

#[test]
fn steady_low_risk_is_reported_as_risk_averse() {
    let history: Vec<DecisionHistoryRecord> = (0..30)
        .map(|i| {
            let jitter = [-0.02, 0.0, 0.02][i as usize % 3];
            DecisionHistoryRecord::new(
                format!("decision-{}", i),
                "procurement",
                reference_time().minus_days(30 - i),
            )
            .with(NumericField::Risk, 0.1 + jitter)
        })
        .collect();

    let analysis = PatternRecognitionEngine::default()
        .analyze(&history, &analysis_config())
        .unwrap();

    let style = analysis
        .identified_patterns
        .iter()
        .find(|p| p.pattern_type == PatternType::Behavioral)
        .expect("behavioral pattern");
    assert_eq!(style.factor("decision_style"), Some("risk_averse"));
    assert!(style.confidence > 0.9);
    assert_eq!(analysis.learning_metrics.total_decisions, 30);
}

#[test]
fn doubled_field_correlates_perfectly() {
    let history = (0..12)
        .map(|i| {
            let score = 0.3 + (i % 5) as f64 * 0.1;
            DecisionHistoryRecord::new(
                format!("decision-{}", i),
                "hiring",
                reference_time().minus_days(20 - i),
            )
            .with(NumericField::Score, score)
            .with(NumericField::Impact, 2.0 * score)
        })
        .collect();

    let analysis = AnalyzePatternsHandler::new(AppConfig::default().patterns)
        .handle(AnalyzePatternsCommand {
            history,
            config: analysis_config(),
        })
        .unwrap();

    let correlation = analysis
        .identified_patterns
        .iter()
        .find(|p| p.pattern_type == PatternType::Correlation)
        .expect("correlation pattern");
    assert!((correlation.metric("correlation").unwrap() - 1.0).abs() < 1e-9);
    assert!(analysis
        .recommendations
        .iter()
        .any(|r| r == "Apply correlation insights to predict decision outcomes"));
}

#[test]
fn rare_patterns_never_survive_filtering() {
    let history = vec![
        DecisionHistoryRecord::new("a", "x", reference_time().minus_days(2))
            .with(NumericField::Score, 0.1)
            .with(NumericField::Impact, 0.2),
        DecisionHistoryRecord::new("b", "x", reference_time().minus_days(1))
            .with(NumericField::Score, 0.4)
            .with(NumericField::Impact, 0.8),
    ];

    let analysis = PatternRecognitionEngine::default()
        .analyze(&history, &analysis_config())
        .unwrap();

    assert!(analysis.identified_patterns.iter().all(|p| p.frequency >= 3.0));
}
