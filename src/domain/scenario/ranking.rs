//! Ranking output shared by the fuzzy and matrix pipelines.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A risk factor and how to mitigate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: String,
    pub mitigation: String,
}

impl RiskFactor {
    pub fn new(factor: impl Into<String>, mitigation: impl Into<String>) -> Self {
        Self {
            factor: factor.into(),
            mitigation: mitigation.into(),
        }
    }
}

/// Risk assessment attached to a ranked alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Overall risk in [0, 1].
    pub overall_risk: f64,
    pub factors: Vec<RiskFactor>,
    #[serde(default)]
    pub contingency_plans: Vec<String>,
}

impl RiskAssessment {
    /// Risk assessment with no factors.
    pub fn bare(overall_risk: f64) -> Self {
        Self {
            overall_risk,
            factors: Vec::new(),
            contingency_plans: Vec::new(),
        }
    }

    /// Factor descriptions.
    pub fn factor_names(&self) -> Vec<&str> {
        self.factors.iter().map(|f| f.factor.as_str()).collect()
    }

    /// Mitigation strategies, one per factor.
    pub fn mitigations(&self) -> Vec<&str> {
        self.factors.iter().map(|f| f.mitigation.as_str()).collect()
    }
}

/// An alternative with its aggregate score and supporting data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRanking {
    pub alternative: String,
    /// Aggregate score in [0, 1].
    pub score: f64,
    /// Score contribution per criterion, in [0, 1].
    pub per_criterion_scores: BTreeMap<String, f64>,
    pub confidence: f64,
    pub risk_assessment: RiskAssessment,
}

/// Sorts rankings by score descending.
///
/// The sort is stable, so alternatives with equal scores keep their input
/// order.
pub fn sort_by_score_desc(rankings: &mut [AlternativeRanking]) {
    rankings.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Gap between the top two scores; 0 with fewer than two rankings.
pub fn score_separation(rankings: &[AlternativeRanking]) -> f64 {
    match rankings {
        [first, second, ..] => first.score - second.score,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(alternative: &str, score: f64) -> AlternativeRanking {
        AlternativeRanking {
            alternative: alternative.to_string(),
            score,
            per_criterion_scores: BTreeMap::new(),
            confidence: 0.5,
            risk_assessment: RiskAssessment::bare(1.0 - score),
        }
    }

    #[test]
    fn sort_keeps_input_order_on_ties() {
        let mut rankings = vec![ranking("A", 0.5), ranking("B", 0.7), ranking("C", 0.5)];

        sort_by_score_desc(&mut rankings);

        let order: Vec<_> = rankings.iter().map(|r| r.alternative.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn separation_is_gap_between_top_two() {
        let rankings = vec![ranking("A", 0.9), ranking("B", 0.6)];
        assert!((score_separation(&rankings) - 0.3).abs() < 1e-12);
        assert_eq!(score_separation(&rankings[..1]), 0.0);
    }

    #[test]
    fn risk_assessment_lists_mitigations() {
        let assessment = RiskAssessment {
            overall_risk: 0.4,
            factors: vec![RiskFactor::new("High uncertainty in cost", "Gather more data on cost")],
            contingency_plans: Vec::new(),
        };

        assert_eq!(assessment.factor_names(), vec!["High uncertainty in cost"]);
        assert_eq!(assessment.mitigations(), vec!["Gather more data on cost"]);
    }
}
