//! Sensitivity analysis - How stable is the TOPSIS ranking under weight changes?

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{DecisionMatrix, MatrixSettings, Topsis};
use crate::domain::foundation::{clamp_unit, DomainError, ValidationError};
use crate::domain::scenario::{AlternativeRanking, Scenario, ScenarioNormalizer};
use crate::ports::ValueProvider;

/// Multipliers within this distance of 1 are treated as the baseline.
const BASELINE_EPSILON: f64 = 1e-12;

/// Rankings observed under one weight multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityVariation {
    pub multiplier: f64,
    pub rankings: Vec<AlternativeRanking>,
    /// Positions whose alternative differs from the baseline order.
    pub ranking_changes: usize,
}

/// Outcome of a sensitivity analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub baseline: Vec<AlternativeRanking>,
    pub variations: Vec<SensitivityVariation>,
    /// 1 means no multiplier changed the ranking.
    pub robustness_score: f64,
    /// Robustness when the multipliers are applied to one criterion at a
    /// time, keyed by criterion name.
    pub criterion_robustness: BTreeMap<String, f64>,
}

/// Re-ranks a scenario under perturbed weights.
pub struct SensitivityAnalyzer;

impl SensitivityAnalyzer {
    /// Runs the analysis with `settings.sensitivity_multipliers`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed scenario or a
    /// non-positive multiplier.
    pub fn analyze(
        scenario: &Scenario,
        provider: &dyn ValueProvider,
        settings: &MatrixSettings,
    ) -> Result<SensitivityResult, DomainError> {
        let multipliers = &settings.sensitivity_multipliers;
        if let Some(bad) = multipliers.iter().find(|m| !m.is_finite() || **m <= 0.0) {
            return Err(DomainError::invalid_subject(
                &scenario.id,
                ValidationError::out_of_range("sensitivity_multipliers", 0.0, f64::MAX, *bad),
            ));
        }

        let normalized = ScenarioNormalizer::normalize(scenario)?;
        let matrix = DecisionMatrix::observe(&normalized, provider);
        let unit = matrix.vector_normalized();

        let baseline = Topsis::rank_matrix(&matrix, &unit, &matrix.weights);
        let baseline_order = order_of(&baseline);

        let variations: Vec<SensitivityVariation> = perturbing(multipliers)
            .map(|multiplier| {
                let weights = renormalized(matrix.weights.iter().map(|w| w * multiplier));
                let rankings = Topsis::rank_matrix(&matrix, &unit, &weights);
                SensitivityVariation {
                    multiplier,
                    ranking_changes: count_ranking_changes(&baseline_order, &order_of(&rankings)),
                    rankings,
                }
            })
            .collect();

        let total_changes: usize = variations.iter().map(|v| v.ranking_changes).sum();
        let robustness_score =
            robustness(total_changes, matrix.alternative_count(), multipliers.len());

        let criterion_robustness = matrix
            .criteria
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let changes: usize = perturbing(multipliers)
                    .map(|multiplier| {
                        let weights = renormalized(
                            matrix
                                .weights
                                .iter()
                                .enumerate()
                                .map(|(k, w)| if k == j { w * multiplier } else { *w }),
                        );
                        let rankings = Topsis::rank_matrix(&matrix, &unit, &weights);
                        count_ranking_changes(&baseline_order, &order_of(&rankings))
                    })
                    .sum();
                let score = robustness(changes, matrix.alternative_count(), multipliers.len());
                (name.clone(), score)
            })
            .collect();

        debug!(
            scenario_id = %scenario.id,
            variations = variations.len(),
            total_changes = total_changes,
            robustness_score = robustness_score,
            "Sensitivity analysis completed"
        );

        Ok(SensitivityResult {
            baseline,
            variations,
            robustness_score,
            criterion_robustness,
        })
    }
}

/// Multipliers other than the baseline.
fn perturbing(multipliers: &[f64]) -> impl Iterator<Item = f64> + '_ {
    multipliers
        .iter()
        .copied()
        .filter(|m| (m - 1.0).abs() >= BASELINE_EPSILON)
}

fn renormalized(weights: impl Iterator<Item = f64>) -> Vec<f64> {
    let weights: Vec<f64> = weights.collect();
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter().map(|w| w / total).collect()
    } else {
        weights
    }
}

fn order_of(rankings: &[AlternativeRanking]) -> Vec<&str> {
    rankings.iter().map(|r| r.alternative.as_str()).collect()
}

/// Index-wise mismatches between two orders.
pub fn count_ranking_changes(baseline: &[&str], other: &[&str]) -> usize {
    baseline
        .iter()
        .zip(other)
        .filter(|(a, b)| a != b)
        .count()
}

/// `1 - changes / (alternatives * (multipliers - 1))`, clamped to [0, 1].
///
/// With fewer than two multipliers nothing can change, so the ranking is
/// fully robust.
pub fn robustness(changes: usize, alternatives: usize, multipliers: usize) -> f64 {
    let denominator = alternatives as f64 * (multipliers as f64 - 1.0);
    if denominator <= 0.0 {
        return 1.0;
    }
    clamp_unit(1.0 - changes as f64 / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TableValueProvider;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::scenario::Criterion;
    use proptest::prelude::*;

    fn close_call() -> (Scenario, TableValueProvider) {
        let scenario = Scenario::builder("s-1", "Close call")
            .criterion("cost", Criterion::minimize(0.5, 0.5))
            .criterion("quality", Criterion::maximize(0.5, 0.5))
            .alternatives(vec!["A", "B"])
            .build();
        let provider = TableValueProvider::new()
            .with("A", "cost", 0.4)
            .with("A", "quality", 0.7)
            .with("B", "cost", 0.3)
            .with("B", "quality", 0.6);
        (scenario, provider)
    }

    // Robustness Formula Tests

    #[test]
    fn robustness_is_one_without_changes() {
        assert_eq!(robustness(0, 3, 5), 1.0);
    }

    #[test]
    fn robustness_drops_with_changes() {
        assert!((robustness(4, 2, 5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn robustness_with_single_multiplier_is_one() {
        assert_eq!(robustness(3, 3, 1), 1.0);
    }

    #[test]
    fn ranking_changes_compare_positions() {
        assert_eq!(count_ranking_changes(&["a", "b", "c"], &["a", "c", "b"]), 2);
        assert_eq!(count_ranking_changes(&["a", "b"], &["a", "b"]), 0);
    }

    // Analysis Tests

    #[test]
    fn uniform_multipliers_keep_ranking() {
        let (scenario, provider) = close_call();

        let result =
            SensitivityAnalyzer::analyze(&scenario, &provider, &MatrixSettings::default()).unwrap();

        assert_eq!(result.variations.len(), 4);
        assert!(result.variations.iter().all(|v| v.ranking_changes == 0));
        assert_eq!(result.robustness_score, 1.0);
    }

    #[test]
    fn baseline_multiplier_is_skipped() {
        let (scenario, provider) = close_call();
        let settings = MatrixSettings {
            sensitivity_multipliers: vec![1.0, 1.5],
            ..MatrixSettings::default()
        };

        let result = SensitivityAnalyzer::analyze(&scenario, &provider, &settings).unwrap();

        assert_eq!(result.variations.len(), 1);
        assert_eq!(result.variations[0].multiplier, 1.5);
    }

    #[test]
    fn per_criterion_perturbation_detects_fragile_ranking() {
        let (scenario, provider) = close_call();
        let settings = MatrixSettings {
            sensitivity_multipliers: vec![0.2, 1.0, 5.0],
            ..MatrixSettings::default()
        };

        let result = SensitivityAnalyzer::analyze(&scenario, &provider, &settings).unwrap();

        assert_eq!(result.criterion_robustness.len(), 2);
        assert!(result.criterion_robustness.values().any(|r| *r < 1.0));
        assert!(result
            .criterion_robustness
            .values()
            .all(|r| (0.0..=1.0).contains(r)));
    }

    #[test]
    fn non_positive_multiplier_is_rejected() {
        let (scenario, provider) = close_call();
        let settings = MatrixSettings {
            sensitivity_multipliers: vec![0.0, 1.0],
            ..MatrixSettings::default()
        };

        let err = SensitivityAnalyzer::analyze(&scenario, &provider, &settings).unwrap_err();

        assert_eq!(err.code, ErrorCode::OutOfRange);
        assert_eq!(err.subject_id(), Some("s-1"));
    }

    // Property Tests

    proptest! {
        #[test]
        fn robustness_stays_in_unit_interval(
            multipliers in prop::collection::vec(0.05f64..5.0, 1..8),
            a_cost in 0.0f64..1.0,
            b_cost in 0.0f64..1.0,
        ) {
            let scenario = Scenario::builder("s-p", "Property")
                .criterion("cost", Criterion::minimize(0.5, 0.3))
                .criterion("quality", Criterion::maximize(0.5, 0.7))
                .alternatives(vec!["A", "B", "C"])
                .build();
            let provider = TableValueProvider::new()
                .with("A", "cost", a_cost)
                .with("B", "cost", b_cost)
                .with("A", "quality", 0.4)
                .with("C", "quality", 0.9);
            let settings = MatrixSettings {
                sensitivity_multipliers: multipliers,
                ..MatrixSettings::default()
            };

            let result = SensitivityAnalyzer::analyze(&scenario, &provider, &settings).unwrap();

            prop_assert!((0.0..=1.0).contains(&result.robustness_score));
        }
    }
}
