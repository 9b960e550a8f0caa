//! Fuzzy sets, linguistic terms and the default set generator.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Criterion;
use crate::domain::foundation::clamp_unit;

/// Universe of discourse used for generated fuzzy sets.
pub const DEFAULT_UNIVERSE: (f64, f64) = (0.0, 1.0);

/// The five standard linguistic terms with their (a, c) ranges.
static DEFAULT_TERMS: Lazy<Vec<LinguisticTerm>> = Lazy::new(|| {
    [
        ("very_low", 0.0, 0.2),
        ("low", 0.0, 0.4),
        ("medium", 0.3, 0.7),
        ("high", 0.6, 1.0),
        ("very_high", 0.8, 1.0),
    ]
    .into_iter()
    .map(|(label, a, c)| LinguisticTerm::triangular(label, a, c))
    .collect()
});

/// Membership function mapping a value to a degree in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Linear ramp from 0 at `min` to 1 at `max`.
    Linear { min: f64, max: f64 },
    /// Zero outside (a, c), rising to 1 at the peak b.
    Triangular { a: f64, b: f64, c: f64 },
    /// Zero outside (a, d), 1 on [b, c].
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFunction {
    /// Triangular function over `[a, c]` peaking at the midpoint.
    pub fn triangular_over(a: f64, c: f64) -> Self {
        MembershipFunction::Triangular {
            a,
            b: (a + c) / 2.0,
            c,
        }
    }

    /// Evaluates the membership degree of `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        match *self {
            MembershipFunction::Linear { min, max } => {
                if max <= min {
                    return if x >= max { 1.0 } else { 0.0 };
                }
                clamp_unit((x - min) / (max - min))
            }
            MembershipFunction::Triangular { a, b, c } => {
                if x <= a || x >= c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if x <= a || x >= d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
        }
    }

    /// Value at which the function reaches its maximum.
    fn peak(&self) -> f64 {
        match *self {
            MembershipFunction::Linear { max, .. } => max,
            MembershipFunction::Triangular { b, .. } => b,
            MembershipFunction::Trapezoidal { b, c, .. } => (b + c) / 2.0,
        }
    }
}

/// A named fuzzy category such as "high".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinguisticTerm {
    pub label: String,
    pub range: (f64, f64),
    pub membership: MembershipFunction,
}

impl LinguisticTerm {
    /// Creates a triangular term over `[a, c]`.
    pub fn triangular(label: impl Into<String>, a: f64, c: f64) -> Self {
        Self {
            label: label.into(),
            range: (a, c),
            membership: MembershipFunction::triangular_over(a, c),
        }
    }

    /// Membership degree of `x` in this term.
    pub fn degree(&self, x: f64) -> f64 {
        self.membership.evaluate(x)
    }
}

/// Fuzzy set over a universe, with linguistic terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySet {
    pub name: String,
    pub universe: (f64, f64),
    pub membership: MembershipFunction,
    #[serde(default)]
    pub linguistic_terms: Vec<LinguisticTerm>,
}

impl FuzzySet {
    /// Membership degree of an observed value, in [0, 1].
    pub fn membership(&self, x: f64) -> f64 {
        clamp_unit(self.membership.evaluate(x))
    }

    /// Returns the linguistic term that best describes `x`.
    ///
    /// Highest membership wins; ties (including all-zero) go to the term
    /// whose peak is closest to `x`.
    pub fn classify(&self, x: f64) -> Option<&LinguisticTerm> {
        self.linguistic_terms.iter().max_by(|left, right| {
            let by_degree = left.degree(x).total_cmp(&right.degree(x));
            let by_distance = (right.membership.peak() - x)
                .abs()
                .total_cmp(&(left.membership.peak() - x).abs());
            by_degree.then(by_distance)
        })
    }
}

/// Attaches default fuzzy sets to criteria lacking one.
pub struct FuzzySetGenerator;

impl FuzzySetGenerator {
    /// Builds the default set for a criterion: linear membership over
    /// [0, 1] plus the five standard triangular terms.
    pub fn default_set(criterion_name: &str) -> FuzzySet {
        let (min, max) = DEFAULT_UNIVERSE;
        FuzzySet {
            name: format!("fuzzy_{}", criterion_name),
            universe: DEFAULT_UNIVERSE,
            membership: MembershipFunction::Linear { min, max },
            linguistic_terms: DEFAULT_TERMS.clone(),
        }
    }

    /// Returns a copy of `criteria` where every criterion has a fuzzy set.
    pub fn generate(criteria: &BTreeMap<String, Criterion>) -> BTreeMap<String, Criterion> {
        criteria
            .iter()
            .map(|(name, criterion)| {
                let mut criterion = criterion.clone();
                if criterion.fuzzy_set.is_none() {
                    criterion.fuzzy_set = Some(Self::default_set(name));
                }
                (name.clone(), criterion)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // Triangular membership

    #[test]
    fn triangular_is_zero_at_and_outside_bounds() {
        let f = MembershipFunction::triangular_over(0.3, 0.7);
        assert_eq!(f.evaluate(0.3), 0.0);
        assert_eq!(f.evaluate(0.7), 0.0);
        assert_eq!(f.evaluate(0.1), 0.0);
        assert_eq!(f.evaluate(0.9), 0.0);
    }

    #[test]
    fn triangular_peaks_at_midpoint() {
        let f = MembershipFunction::triangular_over(0.3, 0.7);
        assert!(close(f.evaluate(0.5), 1.0));
    }

    #[test]
    fn triangular_ramps_linearly() {
        let f = MembershipFunction::triangular_over(0.0, 0.4);
        assert!(close(f.evaluate(0.1), 0.5));
        assert!(close(f.evaluate(0.3), 0.5));
    }

    #[test]
    fn trapezoidal_has_flat_top() {
        let f = MembershipFunction::Trapezoidal {
            a: 0.0,
            b: 0.2,
            c: 0.6,
            d: 0.8,
        };
        assert_eq!(f.evaluate(0.4), 1.0);
        assert!(close(f.evaluate(0.1), 0.5));
        assert!(close(f.evaluate(0.7), 0.5));
        assert_eq!(f.evaluate(0.8), 0.0);
    }

    #[test]
    fn linear_clamps_to_universe() {
        let f = MembershipFunction::Linear { min: 0.0, max: 1.0 };
        assert_eq!(f.evaluate(-0.2), 0.0);
        assert_eq!(f.evaluate(0.35), 0.35);
        assert_eq!(f.evaluate(1.4), 1.0);
    }

    // Default set

    #[test]
    fn default_set_has_five_standard_terms() {
        let set = FuzzySetGenerator::default_set("cost");
        let labels: Vec<_> = set.linguistic_terms.iter().map(|t| t.label.as_str()).collect();

        assert_eq!(set.name, "fuzzy_cost");
        assert_eq!(set.universe, (0.0, 1.0));
        assert_eq!(labels, vec!["very_low", "low", "medium", "high", "very_high"]);
        assert_eq!(set.linguistic_terms[2].range, (0.3, 0.7));
    }

    #[test]
    fn default_set_membership_is_identity_on_unit_interval() {
        let set = FuzzySetGenerator::default_set("quality");
        assert_eq!(set.membership(0.8), 0.8);
        assert_eq!(set.membership(0.0), 0.0);
    }

    #[test]
    fn classify_picks_highest_membership() {
        let set = FuzzySetGenerator::default_set("quality");
        assert_eq!(set.classify(0.5).unwrap().label, "medium");
        assert_eq!(set.classify(0.9).unwrap().label, "very_high");
        assert_eq!(set.classify(0.2).unwrap().label, "low");
    }

    #[test]
    fn classify_falls_back_to_nearest_peak() {
        let set = FuzzySetGenerator::default_set("quality");
        // every term is zero at 0.0; very_low peaks closest
        assert_eq!(set.classify(0.0).unwrap().label, "very_low");
    }

    #[test]
    fn generate_keeps_custom_sets() {
        let custom = FuzzySet {
            name: "custom".to_string(),
            universe: (0.0, 10.0),
            membership: MembershipFunction::Linear { min: 0.0, max: 10.0 },
            linguistic_terms: Vec::new(),
        };
        let mut criteria = BTreeMap::new();
        criteria.insert(
            "speed".to_string(),
            Criterion::maximize(0.5, 0.5).with_fuzzy_set(custom.clone()),
        );
        criteria.insert("cost".to_string(), Criterion::minimize(0.5, 0.5));

        let generated = FuzzySetGenerator::generate(&criteria);

        assert_eq!(generated["speed"].fuzzy_set.as_ref(), Some(&custom));
        assert_eq!(
            generated["cost"].fuzzy_set.as_ref().map(|s| s.name.as_str()),
            Some("fuzzy_cost")
        );
        // input untouched
        assert!(criteria["cost"].fuzzy_set.is_none());
    }
}
