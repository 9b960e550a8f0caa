//! Reasoning Generator - Explanation trace for a fuzzy ranking.
//!
//! The trace always has the same four steps, in order: data collection,
//! fuzzy analysis, comparison, risk conclusion.

use serde::{Deserialize, Serialize};

use super::ranker::criterion_gaps;
use super::FuzzySettings;
use crate::domain::foundation::UnitInterval;
use crate::domain::scenario::{
    score_separation, AlternativeRanking, FuzzySetGenerator, Scenario,
};

/// Number of top alternatives covered by pairwise comparisons.
const COMPARED_ALTERNATIVES: usize = 3;

/// Uncertainty below this counts in the decision's favour.
const LOW_UNCERTAINTY: f64 = 0.3;

/// Kind of a reasoning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningStepKind {
    DataCollection,
    FuzzyAnalysis,
    Comparison,
    RiskConclusion,
}

/// A step of the explanation trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub step: u8,
    pub kind: ReasoningStepKind,
    pub description: String,
    pub rationale: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub confidence: f64,
}

/// Winner versus one runner-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeComparison {
    pub alternatives: (String, String),
    pub winner: String,
    pub margin: f64,
    pub reasoning_factors: Vec<String>,
    pub tradeoffs: Vec<String>,
}

/// Whether a factor raises or lowers confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorImpact {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactor {
    pub factor: String,
    pub impact: FactorImpact,
    pub magnitude: f64,
    pub explanation: String,
}

/// Full explanation of a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReasoning {
    pub steps: Vec<ReasoningStep>,
    pub critical_factors: Vec<String>,
    pub assumptions: Vec<String>,
    pub comparisons: Vec<AlternativeComparison>,
    pub risk_analysis: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence_factors: Vec<ConfidenceFactor>,
}

/// Builds the explanation trace from ranker output.
pub struct ReasoningGenerator;

impl ReasoningGenerator {
    /// Generates reasoning for `rankings`, which must be sorted best first.
    pub fn generate(
        scenario: &Scenario,
        rankings: &[AlternativeRanking],
        settings: &FuzzySettings,
    ) -> DecisionReasoning {
        let critical_factors: Vec<String> = scenario
            .criteria
            .iter()
            .filter(|(_, c)| c.weight > settings.critical_weight_threshold)
            .map(|(name, _)| name.clone())
            .collect();

        DecisionReasoning {
            steps: Self::steps(scenario, rankings),
            comparisons: Self::comparisons(rankings, &critical_factors, settings),
            risk_analysis: Self::risk_analysis(rankings),
            recommendations: Self::recommendations(rankings, &critical_factors),
            confidence_factors: Self::confidence_factors(scenario, rankings),
            assumptions: vec![
                "Criterion weights accurately represent decision priorities".to_string(),
                "Alternative values are reasonably estimated".to_string(),
                "Fuzzy membership functions capture decision preferences".to_string(),
                "Risk factors are identifiable and manageable".to_string(),
            ],
            critical_factors,
        }
    }

    fn steps(scenario: &Scenario, rankings: &[AlternativeRanking]) -> Vec<ReasoningStep> {
        let criteria: Vec<String> = scenario.criteria.keys().cloned().collect();
        let weights: Vec<String> = scenario
            .criteria
            .iter()
            .map(|(name, c)| format!("{}={:.3}", name, c.weight))
            .collect();
        let scores: Vec<String> = rankings
            .iter()
            .map(|r| format!("{}={:.3}", r.alternative, r.score))
            .collect();
        let order: Vec<String> = rankings.iter().map(|r| r.alternative.clone()).collect();

        let (winner_terms, conclusion_inputs, conclusion_outputs) = match rankings.first() {
            Some(top) => (
                Self::linguistic_profile(scenario, top),
                vec![top.alternative.clone()],
                top.risk_assessment
                    .factor_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
            None => (String::new(), Vec::new(), Vec::new()),
        };

        vec![
            ReasoningStep {
                step: 1,
                kind: ReasoningStepKind::DataCollection,
                description: "Analyzed decision criteria and their weights".to_string(),
                rationale: format!(
                    "Identified {} criteria with normalized weights",
                    criteria.len()
                ),
                inputs: criteria,
                outputs: weights,
                confidence: 0.95,
            },
            ReasoningStep {
                step: 2,
                kind: ReasoningStepKind::FuzzyAnalysis,
                description: "Applied fuzzy logic evaluation to each alternative".to_string(),
                rationale: format!(
                    "Used membership functions and weighted aggregation; leader profile: {}",
                    winner_terms
                ),
                inputs: scenario.alternatives.clone(),
                outputs: scores.clone(),
                confidence: 0.85,
            },
            ReasoningStep {
                step: 3,
                kind: ReasoningStepKind::Comparison,
                description: "Ranked alternatives by aggregated fuzzy scores".to_string(),
                rationale: "Sorted by weighted fuzzy score with confidence adjustments"
                    .to_string(),
                inputs: scores,
                outputs: order,
                confidence: 0.9,
            },
            ReasoningStep {
                step: 4,
                kind: ReasoningStepKind::RiskConclusion,
                description: "Generated risk assessment and recommendations".to_string(),
                rationale: "Assessed risks and generated mitigation strategies".to_string(),
                inputs: conclusion_inputs,
                outputs: conclusion_outputs,
                confidence: 0.8,
            },
        ]
    }

    /// Linguistic label of each criterion score, e.g. `cost=high`.
    fn linguistic_profile(scenario: &Scenario, ranking: &AlternativeRanking) -> String {
        ranking
            .per_criterion_scores
            .iter()
            .map(|(name, score)| {
                let set = scenario
                    .criteria
                    .get(name)
                    .and_then(|c| c.fuzzy_set.clone())
                    .unwrap_or_else(|| FuzzySetGenerator::default_set(name));
                let label = set
                    .classify(*score)
                    .map(|term| term.label.clone())
                    .unwrap_or_else(|| "unclassified".to_string());
                format!("{}={}", name, label)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn comparisons(
        rankings: &[AlternativeRanking],
        critical_factors: &[String],
        settings: &FuzzySettings,
    ) -> Vec<AlternativeComparison> {
        let Some(winner) = rankings.first() else {
            return Vec::new();
        };

        rankings
            .iter()
            .take(COMPARED_ALTERNATIVES)
            .skip(1)
            .map(|runner_up| {
                let tradeoffs = criterion_gaps(winner, runner_up)
                    .into_iter()
                    .filter(|(_, gap)| gap.abs() > settings.tradeoff_threshold)
                    .take(settings.max_tradeoffs)
                    .map(|(criterion, gap)| {
                        let (better, worse) = if gap > 0.0 {
                            (&winner.alternative, &runner_up.alternative)
                        } else {
                            (&runner_up.alternative, &winner.alternative)
                        };
                        format!("{} scores higher on {} than {}", better, criterion, worse)
                    })
                    .collect();

                AlternativeComparison {
                    alternatives: (winner.alternative.clone(), runner_up.alternative.clone()),
                    winner: winner.alternative.clone(),
                    margin: winner.score - runner_up.score,
                    reasoning_factors: critical_factors.to_vec(),
                    tradeoffs,
                }
            })
            .collect()
    }

    fn risk_analysis(rankings: &[AlternativeRanking]) -> Vec<String> {
        let Some(top) = rankings.first() else {
            return Vec::new();
        };
        let factors = top.risk_assessment.factor_names();
        vec![
            format!(
                "Overall decision confidence: {}",
                UnitInterval::new(top.confidence)
            ),
            format!(
                "Primary risk factors: {}",
                if factors.is_empty() {
                    "none identified".to_string()
                } else {
                    factors.join(", ")
                }
            ),
            format!(
                "Risk level: {}",
                UnitInterval::new(top.risk_assessment.overall_risk)
            ),
        ]
    }

    fn recommendations(
        rankings: &[AlternativeRanking],
        critical_factors: &[String],
    ) -> Vec<String> {
        let Some(top) = rankings.first() else {
            return Vec::new();
        };
        let mut recommendations = vec![
            format!("Recommended alternative: {}", top.alternative),
            format!("Key success factors: {}", critical_factors.join(", ")),
        ];
        let watch: Vec<&str> = top
            .risk_assessment
            .factor_names()
            .into_iter()
            .take(2)
            .collect();
        if !watch.is_empty() {
            recommendations.push(format!("Monitor: {}", watch.join(", ")));
        }
        recommendations.push("Implement mitigation strategies for identified risks".to_string());
        recommendations
    }

    fn confidence_factors(
        scenario: &Scenario,
        rankings: &[AlternativeRanking],
    ) -> Vec<ConfidenceFactor> {
        let mut factors = Vec::new();

        if rankings.len() > 1 {
            let separation = score_separation(rankings);
            let clear = separation > 0.2;
            factors.push(ConfidenceFactor {
                factor: "Alternative score separation".to_string(),
                impact: if clear {
                    FactorImpact::Positive
                } else {
                    FactorImpact::Negative
                },
                magnitude: separation.abs(),
                explanation: format!(
                    "{} distinction between top alternatives",
                    if clear { "Clear" } else { "Close" }
                ),
            });
        }

        let uncertainty = scenario.average_uncertainty();
        let low = uncertainty < LOW_UNCERTAINTY;
        factors.push(ConfidenceFactor {
            factor: "Criteria uncertainty".to_string(),
            impact: if low {
                FactorImpact::Positive
            } else {
                FactorImpact::Negative
            },
            magnitude: uncertainty,
            explanation: format!(
                "{} uncertainty in criteria values",
                if low { "Low" } else { "High" }
            ),
        });

        factors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TableValueProvider;
    use crate::domain::fuzzy::{FuzzyScorer, Ranker};
    use crate::domain::scenario::Criterion;

    fn scenario() -> Scenario {
        Scenario::builder("s-1", "Vendors")
            .criterion("cost", Criterion::minimize(0.5, 0.45))
            .criterion("quality", Criterion::maximize(0.5, 0.45))
            .criterion("support", Criterion::maximize(0.5, 0.1))
            .alternatives(vec!["A", "B", "C", "D"])
            .build()
    }

    fn rankings(scenario: &Scenario) -> Vec<AlternativeRanking> {
        let provider = TableValueProvider::new()
            .with("A", "cost", 0.1)
            .with("A", "quality", 0.9)
            .with("A", "support", 0.2)
            .with("B", "cost", 0.6)
            .with("B", "quality", 0.5)
            .with("B", "support", 0.9)
            .with("C", "cost", 0.9)
            .with("C", "quality", 0.3)
            .with("C", "support", 0.5)
            .with("D", "cost", 0.95)
            .with("D", "quality", 0.1)
            .with("D", "support", 0.1);
        let scores = FuzzyScorer::score(scenario, &provider);
        Ranker::rank(scenario, &scores, &FuzzySettings::default())
    }

    fn generate() -> DecisionReasoning {
        let scenario = scenario();
        let rankings = rankings(&scenario);
        ReasoningGenerator::generate(&scenario, &rankings, &FuzzySettings::default())
    }

    // Step Tests

    #[test]
    fn trace_has_four_steps_in_fixed_order() {
        let reasoning = generate();
        let kinds: Vec<_> = reasoning.steps.iter().map(|s| s.kind).collect();

        assert_eq!(
            kinds,
            vec![
                ReasoningStepKind::DataCollection,
                ReasoningStepKind::FuzzyAnalysis,
                ReasoningStepKind::Comparison,
                ReasoningStepKind::RiskConclusion,
            ]
        );
        assert_eq!(reasoning.steps[0].confidence, 0.95);
        assert_eq!(reasoning.steps[3].step, 4);
    }

    #[test]
    fn comparison_step_outputs_ranked_order() {
        let reasoning = generate();
        assert_eq!(reasoning.steps[2].outputs, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn fuzzy_step_names_linguistic_terms() {
        let reasoning = generate();
        assert!(reasoning.steps[1].rationale.contains("quality=very_high"));
    }

    // Factor Tests

    #[test]
    fn critical_factors_exceed_weight_threshold() {
        assert_eq!(generate().critical_factors, vec!["cost", "quality"]);
    }

    #[test]
    fn comparisons_cover_top_three() {
        let reasoning = generate();

        assert_eq!(reasoning.comparisons.len(), 2);
        assert_eq!(
            reasoning.comparisons[0].alternatives,
            ("A".to_string(), "B".to_string())
        );
        assert!(reasoning.comparisons.iter().all(|c| c.winner == "A"));
        assert!(reasoning.comparisons[1].margin > reasoning.comparisons[0].margin);
    }

    #[test]
    fn tradeoffs_name_the_better_alternative() {
        let reasoning = generate();
        let tradeoffs = &reasoning.comparisons[0].tradeoffs;

        assert!(tradeoffs.contains(&"A scores higher on cost than B".to_string()));
        assert!(tradeoffs.contains(&"B scores higher on support than A".to_string()));
        assert!(tradeoffs.len() <= 3);
    }

    #[test]
    fn tradeoffs_respect_limit() {
        let scenario = scenario();
        let rankings = rankings(&scenario);
        let settings = FuzzySettings {
            max_tradeoffs: 1,
            ..FuzzySettings::default()
        };

        let reasoning = ReasoningGenerator::generate(&scenario, &rankings, &settings);

        assert!(reasoning.comparisons.iter().all(|c| c.tradeoffs.len() <= 1));
    }

    #[test]
    fn confidence_factors_include_separation_and_uncertainty() {
        let reasoning = generate();
        let names: Vec<_> = reasoning
            .confidence_factors
            .iter()
            .map(|f| f.factor.as_str())
            .collect();

        assert_eq!(names, vec!["Alternative score separation", "Criteria uncertainty"]);
        assert_eq!(reasoning.confidence_factors[1].impact, FactorImpact::Positive);
    }

    #[test]
    fn recommendations_lead_with_winner() {
        let reasoning = generate();
        assert_eq!(reasoning.recommendations[0], "Recommended alternative: A");
        assert_eq!(reasoning.assumptions.len(), 4);
        assert_eq!(reasoning.risk_analysis.len(), 3);
    }
}
