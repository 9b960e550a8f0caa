//! Fuzzy Scorer - Per-criterion fuzzy scores for each alternative.

use std::collections::BTreeMap;

use crate::domain::foundation::clamp_unit;
use crate::domain::scenario::{FuzzySetGenerator, Scenario};
use crate::ports::ValueProvider;

/// Observations and fuzzy scores of one alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeScores {
    pub alternative: String,
    /// Observed value per criterion, in [0, 1].
    pub observed: BTreeMap<String, f64>,
    /// Direction-adjusted membership per criterion, in [0, 1].
    pub criterion_scores: BTreeMap<String, f64>,
}

impl AlternativeScores {
    /// Weighted arithmetic mean of the criterion scores.
    ///
    /// Returns 0 when the scenario's weights sum to zero.
    pub fn aggregate(&self, scenario: &Scenario) -> f64 {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for (name, criterion) in &scenario.criteria {
            if let Some(score) = self.criterion_scores.get(name) {
                weighted_sum += score * criterion.weight;
                total_weight += criterion.weight;
            }
        }
        if total_weight > 0.0 {
            clamp_unit(weighted_sum / total_weight)
        } else {
            0.0
        }
    }
}

/// Fuzzy evaluation of alternatives against criteria.
pub struct FuzzyScorer;

impl FuzzyScorer {
    /// Scores every alternative on every criterion, in input order.
    ///
    /// Score = membership of the observed value, inverted for minimize
    /// criteria. Criteria without a fuzzy set use the default set.
    pub fn score(scenario: &Scenario, provider: &dyn ValueProvider) -> Vec<AlternativeScores> {
        let criteria = FuzzySetGenerator::generate(&scenario.criteria);

        scenario
            .alternatives
            .iter()
            .map(|alternative| {
                let mut observed = BTreeMap::new();
                let mut criterion_scores = BTreeMap::new();

                for (name, criterion) in &criteria {
                    let value = clamp_unit(provider.observe(alternative, name, criterion));
                    let membership = match &criterion.fuzzy_set {
                        Some(set) => set.membership(value),
                        None => value,
                    };
                    observed.insert(name.clone(), value);
                    criterion_scores.insert(name.clone(), criterion.direction.orient(membership));
                }

                AlternativeScores {
                    alternative: alternative.clone(),
                    observed,
                    criterion_scores,
                }
            })
            .collect()
    }
}
