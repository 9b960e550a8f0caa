//! Fuzzy Decision Engine - End-to-end fuzzy MCDA pipeline.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::{
    DecisionLayout, DecisionReasoning, FuzzyScorer, FuzzySettings, Ranker, ReasoningGenerator,
};
use crate::domain::foundation::{clamp_unit, DomainError, Timestamp};
use crate::domain::scenario::{
    AlternativeRanking, FuzzySetGenerator, Scenario, ScenarioNormalizer,
};
use crate::ports::ValueProvider;

/// Criteria count at which scalability bottoms out.
const SCALABILITY_CRITERIA: f64 = 20.0;

/// Diagnostic quality metrics of a decision run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    pub efficiency: f64,
    pub effectiveness: f64,
    pub robustness: f64,
    pub scalability: f64,
    pub interpretability: f64,
}

impl OptimizationMetrics {
    fn compute(scenario: &Scenario, top: Option<&AlternativeRanking>, elapsed_ms: f64) -> Self {
        let (effectiveness, robustness) = match top {
            Some(top) => (top.score, 1.0 - top.risk_assessment.overall_risk * 0.5),
            None => (0.0, 0.0),
        };
        Self {
            efficiency: clamp_unit(1.0 - elapsed_ms / 1000.0),
            effectiveness,
            robustness,
            scalability: (1.0 - scenario.criteria.len() as f64 / SCALABILITY_CRITERIA)
                .clamp(0.5, 1.0),
            interpretability: 0.9,
        }
    }
}

/// Outcome of a fuzzy decision run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub scenario_id: String,
    /// Best first.
    pub ranked_alternatives: Vec<AlternativeRanking>,
    /// Overall decision confidence.
    pub confidence_score: f64,
    pub reasoning: DecisionReasoning,
    pub optimization_metrics: OptimizationMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<DecisionLayout>,
    pub timestamp: Timestamp,
}

impl DecisionResult {
    /// The top-ranked alternative.
    pub fn winner(&self) -> Option<&AlternativeRanking> {
        self.ranked_alternatives.first()
    }
}

/// Runs normalize -> fuzzy sets -> score -> rank -> reason.
pub struct FuzzyDecisionEngine<'a> {
    provider: &'a dyn ValueProvider,
    settings: FuzzySettings,
}

impl<'a> FuzzyDecisionEngine<'a> {
    pub fn new(provider: &'a dyn ValueProvider, settings: FuzzySettings) -> Self {
        Self { provider, settings }
    }

    /// Evaluates a scenario.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the scenario is malformed.
    pub fn execute(&self, scenario: &Scenario) -> Result<DecisionResult, DomainError> {
        let started = Instant::now();

        let mut normalized = ScenarioNormalizer::normalize(scenario)?;
        normalized.criteria = FuzzySetGenerator::generate(&normalized.criteria);

        let scores = FuzzyScorer::score(&normalized, self.provider);
        let rankings = Ranker::rank(&normalized, &scores, &self.settings);
        let confidence_score =
            Ranker::decision_confidence(&rankings, normalized.average_uncertainty());
        let reasoning = ReasoningGenerator::generate(&normalized, &rankings, &self.settings);
        let layout = self
            .settings
            .emit_layout
            .then(|| DecisionLayout::build(&normalized, &rankings));

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let optimization_metrics =
            OptimizationMetrics::compute(&normalized, rankings.first(), elapsed_ms);

        debug!(
            scenario_id = %scenario.id,
            winner = rankings.first().map(|r| r.alternative.as_str()).unwrap_or(""),
            confidence = confidence_score,
            elapsed_ms = elapsed_ms,
            "Fuzzy decision completed"
        );

        Ok(DecisionResult {
            scenario_id: scenario.id.clone(),
            ranked_alternatives: rankings,
            confidence_score,
            reasoning,
            optimization_metrics,
            layout,
            timestamp: Timestamp::now(),
        })
    }
}
