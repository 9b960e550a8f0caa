//! TOPSIS - Ranking by closeness to the ideal solution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::DecisionMatrix;
use crate::domain::foundation::{clamp_unit, DomainError};
use crate::domain::scenario::{
    sort_by_score_desc, AlternativeRanking, Direction, RiskAssessment, Scenario,
    ScenarioNormalizer,
};
use crate::ports::ValueProvider;

/// Distances and closeness of one alternative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Closeness {
    pub distance_to_ideal: f64,
    pub distance_to_negative_ideal: f64,
    /// d- / (d+ + d-), or 0 when both distances are zero.
    pub closeness: f64,
}

/// Technique for Order Preference by Similarity to Ideal Solution.
pub struct Topsis;

impl Topsis {
    /// Ranks the scenario's alternatives.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the scenario is malformed.
    pub fn rank(
        scenario: &Scenario,
        provider: &dyn ValueProvider,
    ) -> Result<Vec<AlternativeRanking>, DomainError> {
        let normalized = ScenarioNormalizer::normalize(scenario)?;
        let matrix = DecisionMatrix::observe(&normalized, provider);
        let rankings = Self::rank_matrix(&matrix, &matrix.vector_normalized(), &matrix.weights);

        debug!(
            scenario_id = %scenario.id,
            alternatives = rankings.len(),
            winner = rankings.first().map(|r| r.alternative.as_str()).unwrap_or(""),
            "TOPSIS ranking completed"
        );

        Ok(rankings)
    }

    /// Ranks a pre-normalized matrix under the given weights.
    ///
    /// Vector normalization does not depend on weights, so callers that
    /// re-rank under many weightings normalize once.
    pub fn rank_matrix(
        matrix: &DecisionMatrix,
        normalized: &[Vec<f64>],
        weights: &[f64],
    ) -> Vec<AlternativeRanking> {
        let weighted = Self::weighted(normalized, weights);
        let closeness = Self::closeness(&weighted, &matrix.directions);
        let all: Vec<f64> = closeness.iter().map(|c| c.closeness).collect();

        let mut rankings: Vec<AlternativeRanking> = matrix
            .alternatives
            .iter()
            .zip(&weighted)
            .zip(&closeness)
            .map(|((alternative, row), c)| {
                let per_criterion_scores: BTreeMap<String, f64> = matrix
                    .criteria
                    .iter()
                    .cloned()
                    .zip(row.iter().copied())
                    .collect();
                AlternativeRanking {
                    alternative: alternative.clone(),
                    score: c.closeness,
                    per_criterion_scores,
                    confidence: Self::confidence(c.closeness, &all),
                    risk_assessment: RiskAssessment::bare(1.0 - c.closeness),
                }
            })
            .collect();

        sort_by_score_desc(&mut rankings);
        rankings
    }

    /// Multiplies each column by its weight.
    pub fn weighted(normalized: &[Vec<f64>], weights: &[f64]) -> Vec<Vec<f64>> {
        normalized
            .iter()
            .map(|row| row.iter().zip(weights).map(|(v, w)| v * w).collect())
            .collect()
    }

    /// Closeness of every row of a weighted matrix to the ideal solution.
    ///
    /// Ideal takes the column max for maximize criteria and the min for
    /// minimize criteria; negative-ideal takes the opposite extreme.
    pub fn closeness(weighted: &[Vec<f64>], directions: &[Direction]) -> Vec<Closeness> {
        let (ideal, negative_ideal) = Self::ideals(weighted, directions);

        weighted
            .iter()
            .map(|row| {
                let d_plus = euclidean(row, &ideal);
                let d_minus = euclidean(row, &negative_ideal);
                let total = d_plus + d_minus;
                let closeness = if total > 0.0 {
                    d_minus / total
                } else {
                    debug!("TOPSIS distance sum is zero, closeness set to 0");
                    0.0
                };
                Closeness {
                    distance_to_ideal: d_plus,
                    distance_to_negative_ideal: d_minus,
                    closeness,
                }
            })
            .collect()
    }

    fn ideals(weighted: &[Vec<f64>], directions: &[Direction]) -> (Vec<f64>, Vec<f64>) {
        directions
            .iter()
            .enumerate()
            .map(|(j, direction)| {
                let column = weighted.iter().map(|row| row[j]);
                let max = column.clone().fold(f64::NEG_INFINITY, f64::max);
                let min = column.fold(f64::INFINITY, f64::min);
                match direction {
                    Direction::Maximize => (max, min),
                    Direction::Minimize => (min, max),
                }
            })
            .unzip()
    }

    /// Higher for alternatives whose closeness stands out from the mean.
    fn confidence(closeness: f64, all: &[f64]) -> f64 {
        let n = all.len() as f64;
        let mean = all.iter().sum::<f64>() / n;
        let std_dev = (all.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n).sqrt();
        let spread = if std_dev > 0.0 { std_dev } else { 1.0 };
        clamp_unit(0.5 + (closeness - mean).abs() / spread * 0.3)
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
