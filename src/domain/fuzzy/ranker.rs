//! Ranker - Aggregation, constraint handling, confidence and risk.

use super::{AlternativeScores, FuzzySettings};
use crate::domain::foundation::{clamp_unit, stable_hash};
use crate::domain::scenario::{
    sort_by_score_desc, AlternativeRanking, ConstraintKind, RiskAssessment, RiskFactor, Scenario,
};

/// Discount applied per unit of mean uncertainty to each alternative.
const ALTERNATIVE_UNCERTAINTY_DISCOUNT: f64 = 0.5;

/// Discount applied per unit of mean uncertainty to the decision.
const DECISION_UNCERTAINTY_DISCOUNT: f64 = 0.3;

/// Bonus per unit of separation from the next-worse alternative.
const SEPARATION_BONUS: f64 = 0.1;

/// Risk above which a generic factor is added when none apply.
const GENERIC_RISK_THRESHOLD: f64 = 0.5;

const CONTINGENCY_PLANS: [&str; 3] = [
    "Prepare alternative options",
    "Establish monitoring metrics",
    "Define rollback procedures",
];

/// Aggregated score of an alternative after constraints.
#[derive(Debug, Clone, PartialEq)]
struct ConstrainedScore {
    score: f64,
    violations: Vec<RiskFactor>,
}

/// Turns per-criterion fuzzy scores into a ranked list.
pub struct Ranker;

impl Ranker {
    /// Ranks alternatives by aggregate score, descending.
    ///
    /// Ties keep the input order of `scores`.
    pub fn rank(
        scenario: &Scenario,
        scores: &[AlternativeScores],
        settings: &FuzzySettings,
    ) -> Vec<AlternativeRanking> {
        let average_uncertainty = scenario.average_uncertainty();
        let criteria_factors = Self::criteria_risk_factors(scenario, settings);

        let mut rankings: Vec<AlternativeRanking> = scores
            .iter()
            .map(|alternative| {
                let constrained = Self::apply_constraints(scenario, alternative);
                let mut factors = criteria_factors.clone();
                factors.extend(constrained.violations);

                AlternativeRanking {
                    alternative: alternative.alternative.clone(),
                    score: constrained.score,
                    per_criterion_scores: alternative.criterion_scores.clone(),
                    confidence: 0.0,
                    risk_assessment: Self::risk_assessment(
                        &alternative.alternative,
                        constrained.score,
                        factors,
                    ),
                }
            })
            .collect();

        sort_by_score_desc(&mut rankings);

        let sorted_scores: Vec<f64> = rankings.iter().map(|r| r.score).collect();
        for (index, ranking) in rankings.iter_mut().enumerate() {
            ranking.confidence =
                Self::alternative_confidence(index, &sorted_scores, average_uncertainty);
        }

        rankings
    }

    /// Overall decision confidence.
    ///
    /// Top alternative's confidence, boosted by its margin over the
    /// runner-up and discounted by mean criteria uncertainty.
    pub fn decision_confidence(rankings: &[AlternativeRanking], average_uncertainty: f64) -> f64 {
        let Some(top) = rankings.first() else {
            return 0.0;
        };
        let mut confidence = top.confidence;
        if let Some(second) = rankings.get(1) {
            confidence *= 1.0 + (top.score - second.score);
        }
        confidence *= 1.0 - average_uncertainty * DECISION_UNCERTAINTY_DISCOUNT;
        clamp_unit(confidence)
    }

    fn apply_constraints(scenario: &Scenario, scores: &AlternativeScores) -> ConstrainedScore {
        let mut score = scores.aggregate(scenario);
        let mut hard_violation = false;
        let mut violations = Vec::new();

        for constraint in &scenario.constraints {
            let Some(observed) = scores.observed.get(&constraint.criterion) else {
                continue;
            };
            if !constraint.is_violated_by(*observed) {
                continue;
            }
            match constraint.kind {
                ConstraintKind::Hard => {
                    hard_violation = true;
                    violations.push(RiskFactor::new(
                        format!("Violates hard constraint {}", constraint.describe()),
                        format!(
                            "Exclude {} or relax the constraint on {}",
                            scores.alternative, constraint.criterion
                        ),
                    ));
                }
                ConstraintKind::Soft => {
                    score -= constraint.soft_penalty();
                    violations.push(RiskFactor::new(
                        format!("Violates soft constraint {}", constraint.describe()),
                        format!("Negotiate {} toward {}", constraint.criterion, constraint.value),
                    ));
                }
            }
        }

        ConstrainedScore {
            score: if hard_violation { 0.0 } else { clamp_unit(score) },
            violations,
        }
    }

    fn alternative_confidence(
        index: usize,
        sorted_scores: &[f64],
        average_uncertainty: f64,
    ) -> f64 {
        let score = sorted_scores[index];
        let mut confidence = score;

        if index > 0 {
            confidence *= 1.0 - (sorted_scores[index - 1] - score);
        }
        if let Some(worse) = sorted_scores.get(index + 1) {
            confidence *= 1.0 + (score - worse) * SEPARATION_BONUS;
        }
        confidence *= 1.0 - average_uncertainty * ALTERNATIVE_UNCERTAINTY_DISCOUNT;

        clamp_unit(confidence)
    }

    fn criteria_risk_factors(scenario: &Scenario, settings: &FuzzySettings) -> Vec<RiskFactor> {
        let mut factors = Vec::new();
        for (name, criterion) in &scenario.criteria {
            if criterion.uncertainty > settings.uncertainty_risk_threshold {
                factors.push(RiskFactor::new(
                    format!("High uncertainty in {}", name),
                    format!("Gather more data on {}", name),
                ));
            }
            let high_minimized = criterion.direction.is_minimize()
                && criterion.value > settings.minimize_risk_threshold;
            if high_minimized {
                factors.push(RiskFactor::new(
                    format!("High {} values", name),
                    format!("Implement {} reduction strategies", name),
                ));
            }
        }
        factors
    }

    /// Risk = 1 - score plus a small stable per-alternative offset.
    fn risk_assessment(
        alternative: &str,
        score: f64,
        mut factors: Vec<RiskFactor>,
    ) -> RiskAssessment {
        let offset = f64::from(stable_hash(alternative) % 20) / 100.0;
        let overall_risk = clamp_unit(1.0 - score + offset);

        if factors.is_empty() && overall_risk > GENERIC_RISK_THRESHOLD {
            factors.push(RiskFactor::new(
                "Moderate decision uncertainty",
                "Monitor decision outcomes closely",
            ));
        }

        RiskAssessment {
            overall_risk,
            factors,
            contingency_plans: CONTINGENCY_PLANS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Per-criterion score gaps between two rankings, largest first.
pub(crate) fn criterion_gaps(
    left: &AlternativeRanking,
    right: &AlternativeRanking,
) -> Vec<(String, f64)> {
    let mut gaps: Vec<(String, f64)> = left
        .per_criterion_scores
        .iter()
        .map(|(name, score)| {
            let other = right.per_criterion_scores.get(name).copied().unwrap_or(0.0);
            (name.clone(), score - other)
        })
        .collect();
    gaps.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    gaps
}
