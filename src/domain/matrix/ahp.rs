//! AHP - Analytic Hierarchy Process.
//!
//! Criteria weights come from a pairwise comparison matrix (supplied by
//! the caller or synthesised from the scenario's weights). Alternatives are
//! weighted per criterion from observed-value ratios, and the two levels
//! are combined into a final score.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::{DecisionMatrix, MatrixSettings};
use crate::domain::foundation::{clamp_unit, DomainError, ValidationError};
use crate::domain::scenario::{
    sort_by_score_desc, AlternativeRanking, RiskAssessment, Scenario, ScenarioNormalizer,
};
use crate::ports::ValueProvider;

/// Saaty random consistency index for n = 1..10.
const RANDOM_INDEX: [f64; 10] = [0.0, 0.0, 0.58, 0.9, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

/// Bounds of the 1-9 comparison scale.
const SCALE_MIN: f64 = 1.0 / 9.0;
const SCALE_MAX: f64 = 9.0;

/// Values below this are floored before taking ratios.
const RATIO_FLOOR: f64 = 0.01;

/// Added to an alternative's score to form its confidence.
const CONFIDENCE_BOOST: f64 = 0.2;

/// A square reciprocal comparison matrix with labelled rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseMatrix {
    pub labels: Vec<String>,
    /// `values[i][j]` is how strongly item i is preferred over item j.
    pub values: Vec<Vec<f64>>,
}

impl PairwiseMatrix {
    /// Builds a comparison matrix from positive magnitudes.
    ///
    /// Each entry is the ratio of magnitudes clamped to the 1-9 scale;
    /// magnitudes below 0.01 are floored first.
    pub fn from_magnitudes(labels: Vec<String>, magnitudes: &[f64]) -> Self {
        let floored: Vec<f64> = magnitudes.iter().map(|m| m.max(RATIO_FLOOR)).collect();
        let values = floored
            .iter()
            .enumerate()
            .map(|(i, a)| {
                floored
                    .iter()
                    .enumerate()
                    .map(|(j, b)| {
                        if i == j {
                            1.0
                        } else {
                            (a / b).clamp(SCALE_MIN, SCALE_MAX)
                        }
                    })
                    .collect()
            })
            .collect();
        Self { labels, values }
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Checks shape and entries.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let n = self.size();
        if n == 0 {
            return Err(ValidationError::empty_field("comparisons.labels"));
        }
        if self.values.len() != n || self.values.iter().any(|row| row.len() != n) {
            return Err(ValidationError::invalid_format(
                "comparisons.values",
                format!("expected a {}x{} matrix", n, n),
            ));
        }
        if self
            .values
            .iter()
            .flatten()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(ValidationError::invalid_format(
                "comparisons.values",
                "entries must be positive finite numbers",
            ));
        }
        Ok(())
    }

    /// Returns a copy with rows and columns ordered as `order`.
    ///
    /// Fails if the labels are not exactly the names in `order`.
    pub fn reordered(&self, order: &[String]) -> Result<Self, ValidationError> {
        if order.len() != self.size() {
            return Err(ValidationError::invalid_format(
                "comparisons.labels",
                format!("expected {} labels, got {}", order.len(), self.size()),
            ));
        }
        let index: Vec<usize> = order
            .iter()
            .map(|name| {
                self.labels.iter().position(|l| l == name).ok_or_else(|| {
                    ValidationError::invalid_format(
                        "comparisons.labels",
                        format!("missing criterion '{}'", name),
                    )
                })
            })
            .collect::<Result<_, _>>()?;

        let values = index
            .iter()
            .map(|&i| index.iter().map(|&j| self.values[i][j]).collect())
            .collect();
        Ok(Self {
            labels: order.to_vec(),
            values,
        })
    }

    /// Priority vector by the geometric mean of each row, normalized to 1.
    pub fn geometric_mean_weights(&self) -> Vec<f64> {
        let n = self.size() as f64;
        let means: Vec<f64> = self
            .values
            .iter()
            .map(|row| (row.iter().map(|v| v.ln()).sum::<f64>() / n).exp())
            .collect();
        let total: f64 = means.iter().sum();
        if total > 0.0 {
            means.iter().map(|m| m / total).collect()
        } else {
            vec![1.0 / n; self.size()]
        }
    }

    /// Consistency ratio CI / RI, with lambda-max estimated from A*w.
    ///
    /// Matrices of size 1 or 2 are always consistent.
    pub fn consistency_ratio(&self, weights: &[f64]) -> f64 {
        let n = self.size();
        if n <= 2 {
            return 0.0;
        }

        let ratios: Vec<f64> = self
            .values
            .iter()
            .zip(weights)
            .filter(|(_, w)| **w > 0.0)
            .map(|(row, w)| row.iter().zip(weights).map(|(a, wj)| a * wj).sum::<f64>() / w)
            .collect();
        if ratios.is_empty() {
            return 0.0;
        }
        let lambda_max = ratios.iter().sum::<f64>() / ratios.len() as f64;
        let consistency_index = (lambda_max - n as f64) / (n as f64 - 1.0);
        let random_index = RANDOM_INDEX.get(n - 1).copied().unwrap_or(1.49);

        (consistency_index / random_index).max(0.0)
    }
}

/// AHP ranking with its intermediate results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhpOutcome {
    pub rankings: Vec<AlternativeRanking>,
    pub criteria_weights: BTreeMap<String, f64>,
    pub consistency_ratio: f64,
    /// False when the consistency ratio exceeds the warning threshold.
    pub consistent: bool,
}

/// Analytic Hierarchy Process ranking.
pub struct Ahp;

impl Ahp {
    /// Ranks the scenario's alternatives.
    ///
    /// `comparisons` overrides the synthesised criteria matrix; its labels
    /// must be exactly the scenario's criteria names.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed scenario or comparison
    /// matrix. An inconsistent matrix only logs a warning.
    pub fn rank(
        scenario: &Scenario,
        provider: &dyn ValueProvider,
        comparisons: Option<&PairwiseMatrix>,
        settings: &MatrixSettings,
    ) -> Result<AhpOutcome, DomainError> {
        let normalized = ScenarioNormalizer::normalize(scenario)?;
        let matrix = DecisionMatrix::observe(&normalized, provider);

        let criteria_matrix = match comparisons {
            Some(supplied) => {
                let invalid = |err| DomainError::invalid_subject(&scenario.id, err);
                supplied.validate().map_err(invalid)?;
                supplied.reordered(&matrix.criteria).map_err(invalid)?
            }
            None => PairwiseMatrix::from_magnitudes(matrix.criteria.clone(), &matrix.weights),
        };

        let criteria_weights = criteria_matrix.geometric_mean_weights();
        let consistency_ratio = criteria_matrix.consistency_ratio(&criteria_weights);
        let consistent = consistency_ratio <= settings.consistency_warning_threshold;
        if !consistent {
            warn!(
                scenario_id = %scenario.id,
                consistency_ratio = consistency_ratio,
                threshold = settings.consistency_warning_threshold,
                "AHP consistency ratio exceeds threshold"
            );
        }

        let sub_weights = Self::alternative_weights(&matrix);
        let mut rankings: Vec<AlternativeRanking> = matrix
            .alternatives
            .iter()
            .enumerate()
            .map(|(i, alternative)| {
                let per_criterion_scores: BTreeMap<String, f64> = matrix
                    .criteria
                    .iter()
                    .enumerate()
                    .map(|(j, name)| (name.clone(), criteria_weights[j] * sub_weights[j][i]))
                    .collect();
                let score = clamp_unit(per_criterion_scores.values().sum());
                AlternativeRanking {
                    alternative: alternative.clone(),
                    score,
                    per_criterion_scores,
                    confidence: clamp_unit(score + CONFIDENCE_BOOST),
                    risk_assessment: RiskAssessment::bare(1.0 - score),
                }
            })
            .collect();
        sort_by_score_desc(&mut rankings);

        debug!(
            scenario_id = %scenario.id,
            consistency_ratio = consistency_ratio,
            winner = rankings.first().map(|r| r.alternative.as_str()).unwrap_or(""),
            "AHP ranking completed"
        );

        Ok(AhpOutcome {
            rankings,
            criteria_weights: matrix.criteria.iter().cloned().zip(criteria_weights).collect(),
            consistency_ratio,
            consistent,
        })
    }

    /// Per criterion, priority of each alternative from its
    /// direction-oriented observed values.
    fn alternative_weights(matrix: &DecisionMatrix) -> Vec<Vec<f64>> {
        (0..matrix.criterion_count())
            .map(|j| {
                let direction = matrix.directions[j];
                let performance: Vec<f64> = matrix
                    .column(j)
                    .into_iter()
                    .map(|v| direction.orient(v))
                    .collect();
                PairwiseMatrix::from_magnitudes(matrix.alternatives.clone(), &performance)
                    .geometric_mean_weights()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TableValueProvider;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::scenario::Criterion;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn vendor_scenario() -> Scenario {
        Scenario::builder("s-1", "Vendors")
            .criterion("cost", Criterion::minimize(0.5, 0.5))
            .criterion("quality", Criterion::maximize(0.5, 0.5))
            .alternatives(vec!["A", "B"])
            .build()
    }

    fn vendor_provider() -> TableValueProvider {
        TableValueProvider::new()
            .with("A", "cost", 0.2)
            .with("A", "quality", 0.8)
            .with("B", "cost", 0.8)
            .with("B", "quality", 0.2)
    }

    // Pairwise Matrix Tests

    #[test]
    fn magnitudes_produce_reciprocal_matrix() {
        let m = PairwiseMatrix::from_magnitudes(labels(&["a", "b"]), &[0.6, 0.2]);

        assert_eq!(m.values[0][0], 1.0);
        assert!((m.values[0][1] - 3.0).abs() < 1e-12);
        assert!((m.values[1][0] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn ratios_clamp_to_scale() {
        let m = PairwiseMatrix::from_magnitudes(labels(&["a", "b"]), &[1.0, 0.0]);

        assert_eq!(m.values[0][1], 9.0);
        assert!((m.values[1][0] - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn geometric_mean_recovers_consistent_weights() {
        let m = PairwiseMatrix::from_magnitudes(labels(&["a", "b", "c"]), &[0.5, 0.3, 0.2]);
        let weights = m.geometric_mean_weights();

        assert!((weights[0] - 0.5).abs() < 1e-9);
        assert!((weights[1] - 0.3).abs() < 1e-9);
        assert!((weights[2] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn consistent_matrix_has_zero_ratio() {
        let magnitudes = [0.4, 0.3, 0.2, 0.1];
        let m = PairwiseMatrix::from_magnitudes(labels(&["a", "b", "c", "d"]), &magnitudes);
        let weights = m.geometric_mean_weights();

        assert!(m.consistency_ratio(&weights).abs() < 1e-9);
    }

    #[test]
    fn cyclic_preferences_are_inconsistent() {
        let m = PairwiseMatrix {
            labels: labels(&["a", "b", "c"]),
            values: vec![
                vec![1.0, 9.0, 1.0 / 9.0],
                vec![1.0 / 9.0, 1.0, 9.0],
                vec![9.0, 1.0 / 9.0, 1.0],
            ],
        };
        let weights = m.geometric_mean_weights();

        assert!(m.consistency_ratio(&weights) > 0.1);
    }

    #[test]
    fn small_matrices_are_always_consistent() {
        let m = PairwiseMatrix {
            labels: labels(&["a", "b"]),
            values: vec![vec![1.0, 7.0], vec![0.5, 1.0]],
        };
        assert_eq!(m.consistency_ratio(&m.geometric_mean_weights()), 0.0);
    }

    #[test]
    fn reordered_follows_requested_order() {
        let m = PairwiseMatrix {
            labels: labels(&["quality", "cost"]),
            values: vec![vec![1.0, 3.0], vec![1.0 / 3.0, 1.0]],
        };

        let reordered = m.reordered(&labels(&["cost", "quality"])).unwrap();

        assert_eq!(reordered.labels, labels(&["cost", "quality"]));
        assert!((reordered.values[0][1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_ragged_and_non_positive() {
        let ragged = PairwiseMatrix {
            labels: labels(&["a", "b"]),
            values: vec![vec![1.0, 2.0], vec![1.0]],
        };
        let negative = PairwiseMatrix {
            labels: labels(&["a", "b"]),
            values: vec![vec![1.0, -2.0], vec![0.5, 1.0]],
        };

        assert!(ragged.validate().is_err());
        assert!(negative.validate().is_err());
    }

    // Ranking Tests

    #[test]
    fn ranks_dominant_alternative_first() {
        let outcome = Ahp::rank(
            &vendor_scenario(),
            &vendor_provider(),
            None,
            &MatrixSettings::default(),
        )
        .unwrap();

        assert_eq!(outcome.rankings[0].alternative, "A");
        assert!((outcome.rankings[0].score - 0.8).abs() < 1e-9);
        assert!((outcome.rankings[0].confidence - 1.0).abs() < 1e-9);
        assert!((outcome.rankings[1].confidence - 0.4).abs() < 1e-9);
        assert!(outcome.consistent);
    }

    #[test]
    fn scores_sum_to_one() {
        let outcome = Ahp::rank(
            &vendor_scenario(),
            &vendor_provider(),
            None,
            &MatrixSettings::default(),
        )
        .unwrap();
        let total: f64 = outcome.rankings.iter().map(|r| r.score).sum();

        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn supplied_comparisons_drive_criteria_weights() {
        let comparisons = PairwiseMatrix {
            labels: labels(&["quality", "cost"]),
            values: vec![vec![1.0, 4.0], vec![0.25, 1.0]],
        };

        let outcome = Ahp::rank(
            &vendor_scenario(),
            &vendor_provider(),
            Some(&comparisons),
            &MatrixSettings::default(),
        )
        .unwrap();

        assert!((outcome.criteria_weights["quality"] - 0.8).abs() < 1e-9);
        assert!((outcome.criteria_weights["cost"] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn mismatched_comparison_labels_fail() {
        let comparisons = PairwiseMatrix {
            labels: labels(&["quality", "speed"]),
            values: vec![vec![1.0, 4.0], vec![0.25, 1.0]],
        };

        let err = Ahp::rank(
            &vendor_scenario(),
            &vendor_provider(),
            Some(&comparisons),
            &MatrixSettings::default(),
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.subject_id(), Some("s-1"));
    }

    #[test]
    fn inconsistent_comparisons_are_flagged_not_fatal() {
        let scenario = Scenario::builder("s-2", "Three criteria")
            .criterion("a", Criterion::maximize(0.5, 1.0))
            .criterion("b", Criterion::maximize(0.5, 1.0))
            .criterion("c", Criterion::maximize(0.5, 1.0))
            .alternatives(vec!["X", "Y"])
            .build();
        let comparisons = PairwiseMatrix {
            labels: labels(&["a", "b", "c"]),
            values: vec![
                vec![1.0, 9.0, 1.0 / 9.0],
                vec![1.0 / 9.0, 1.0, 9.0],
                vec![9.0, 1.0 / 9.0, 1.0],
            ],
        };

        let outcome = Ahp::rank(
            &scenario,
            &TableValueProvider::new(),
            Some(&comparisons),
            &MatrixSettings::default(),
        )
        .unwrap();

        assert!(!outcome.consistent);
        assert_eq!(outcome.rankings.len(), 2);
    }
}
