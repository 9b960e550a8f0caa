//! Scenario Normalizer - Validates a scenario and rescales it.
//!
//! Every scoring pipeline runs its input through `ScenarioNormalizer`
//! first, so malformed scenarios fail before any computation.

use std::collections::HashSet;
use tracing::debug;

use super::{FuzzySet, MembershipFunction, Scenario};
use crate::domain::foundation::{clamp_unit, DomainError, ErrorCode, ValidationError};

/// Weight sums this close to 1 are treated as already normalized.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-12;

/// Validation and rescaling of decision scenarios.
pub struct ScenarioNormalizer;

impl ScenarioNormalizer {
    /// Validates `scenario` and returns a normalized copy.
    ///
    /// Weights are rescaled to sum to 1, values and uncertainties are
    /// clamped to [0, 1]. Normalizing an already-normalized scenario
    /// returns it unchanged.
    ///
    /// # Errors
    ///
    /// Fails when alternatives or criteria are empty, names are blank or
    /// duplicated, any number is non-finite, a weight is negative, the
    /// total weight is zero, a fuzzy set is malformed, or a constraint
    /// names an unknown criterion.
    pub fn normalize(scenario: &Scenario) -> Result<Scenario, DomainError> {
        Self::validate(scenario)?;

        let total: f64 = scenario.criteria.values().map(|c| c.weight).sum();
        if total <= 0.0 {
            return Err(DomainError::new(
                ErrorCode::ZeroTotalWeight,
                "Total criteria weight must be greater than zero",
            )
            .with_subject(&scenario.id));
        }
        let rescale = (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE;

        let mut normalized = scenario.clone();
        for criterion in normalized.criteria.values_mut() {
            if rescale {
                criterion.weight /= total;
            }
            criterion.value = clamp_unit(criterion.value);
            criterion.uncertainty = clamp_unit(criterion.uncertainty);
        }

        debug!(
            scenario_id = %scenario.id,
            criteria = normalized.criteria.len(),
            alternatives = normalized.alternatives.len(),
            total_weight = total,
            "Scenario normalized"
        );

        Ok(normalized)
    }

    fn validate(scenario: &Scenario) -> Result<(), DomainError> {
        let invalid = |err: ValidationError| DomainError::invalid_subject(&scenario.id, err);

        if scenario.alternatives.is_empty() {
            return Err(invalid(ValidationError::empty_field("alternatives")));
        }
        let mut seen = HashSet::new();
        for alternative in &scenario.alternatives {
            if alternative.trim().is_empty() {
                return Err(invalid(ValidationError::empty_field("alternatives[]")));
            }
            if !seen.insert(alternative.as_str()) {
                return Err(invalid(ValidationError::duplicate(
                    "alternatives",
                    alternative.clone(),
                )));
            }
        }

        if scenario.criteria.is_empty() {
            return Err(invalid(ValidationError::empty_field("criteria")));
        }
        for (name, criterion) in &scenario.criteria {
            if name.trim().is_empty() {
                return Err(invalid(ValidationError::empty_field("criteria{}")));
            }
            let field = |suffix: &str| format!("criteria.{}.{}", name, suffix);

            for (suffix, number) in [
                ("value", criterion.value),
                ("weight", criterion.weight),
                ("uncertainty", criterion.uncertainty),
            ] {
                if !number.is_finite() {
                    return Err(invalid(ValidationError::non_finite(field(suffix))));
                }
            }
            if criterion.weight < 0.0 {
                return Err(invalid(ValidationError::out_of_range(
                    field("weight"),
                    0.0,
                    f64::MAX,
                    criterion.weight,
                )));
            }
            if let Some(set) = &criterion.fuzzy_set {
                Self::validate_fuzzy_set(set).map_err(|reason| {
                    invalid(ValidationError::invalid_format(field("fuzzy_set"), reason))
                })?;
            }
        }

        for constraint in &scenario.constraints {
            if !scenario.criteria.contains_key(&constraint.criterion) {
                return Err(DomainError::new(
                    ErrorCode::UnknownCriterion,
                    format!(
                        "Constraint '{}' refers to unknown criterion",
                        constraint.describe()
                    ),
                )
                .with_detail("criterion", constraint.criterion.clone())
                .with_subject(&scenario.id));
            }
            if !constraint.value.is_finite() || !constraint.penalty.unwrap_or(0.0).is_finite() {
                return Err(invalid(ValidationError::non_finite(format!(
                    "constraints.{}",
                    constraint.criterion
                ))));
            }
        }

        Ok(())
    }

    fn validate_fuzzy_set(set: &FuzzySet) -> Result<(), String> {
        let (lo, hi) = set.universe;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(format!("universe [{}, {}] is not a valid range", lo, hi));
        }
        let points: Vec<f64> = match set.membership {
            MembershipFunction::Linear { min, max } => vec![min, max],
            MembershipFunction::Triangular { a, b, c } => vec![a, b, c],
            MembershipFunction::Trapezoidal { a, b, c, d } => vec![a, b, c, d],
        };
        if points.iter().any(|p| !p.is_finite()) {
            return Err("membership function has non-finite parameters".to_string());
        }
        if points.windows(2).any(|w| w[0] > w[1]) {
            return Err("membership function parameters must be ascending".to_string());
        }
        Ok(())
    }
}
