//! Temporal detection - Daily and weekly cycles, and trends over time.

use std::collections::HashSet;

use super::stats::{linear_regression, min_max};
use super::{
    IdentifiedPattern, NumericField, PatternDetector, PatternSettings, PatternType,
    PatternVariable, PreparedHistory,
};
use crate::domain::foundation::clamp_unit;

/// Distinct (day, hour) buckets needed before looking for a daily cycle.
const MIN_HOUR_BUCKETS: usize = 24;
/// Distinct days needed before looking for a weekly cycle.
const MIN_DAY_BUCKETS: usize = 14;

const TREND_FIELDS: [NumericField; 4] = [
    NumericField::Score,
    NumericField::Confidence,
    NumericField::Risk,
    NumericField::Duration,
];
const TREND_MIN_SAMPLES: usize = 5;
const TREND_MIN_SLOPE: f64 = 0.01;
const TREND_MIN_R_SQUARED: f64 = 0.5;

const PREDICTIVE_FACTOR: f64 = 0.8;

/// How far a distribution is from uniform, in [0, 1].
///
/// 0 for a uniform distribution, 1 when all mass sits in one bucket.
pub fn cyclical_strength(distribution: &[f64]) -> f64 {
    if distribution.len() < 2 {
        return 0.0;
    }
    let n = distribution.len() as f64;
    let uniform = 1.0 / n;
    let variance = distribution
        .iter()
        .map(|v| (v - uniform).powi(2))
        .sum::<f64>()
        / n;
    let max_variance = (1.0 - uniform).powi(2) / n + uniform.powi(2) * (n - 1.0) / n;
    clamp_unit(variance / max_variance)
}

/// Share of records falling in each bucket.
fn distribution(buckets: impl Iterator<Item = usize>, size: usize) -> Vec<f64> {
    let mut counts = vec![0.0; size];
    for bucket in buckets {
        counts[bucket] += 1.0;
    }
    let total: f64 = counts.iter().sum();
    if total > 0.0 {
        counts.iter().map(|c| c / total).collect()
    } else {
        counts
    }
}

/// Daily and weekly cycles, plus linear trends of the tracked fields.
pub struct TemporalDetector;

impl TemporalDetector {
    /// Cycles in when decisions are made.
    pub fn cycles(
        history: &PreparedHistory,
        settings: &PatternSettings,
    ) -> Vec<IdentifiedPattern> {
        let mut patterns = Vec::new();

        let hour_buckets: HashSet<_> = history.timestamps().map(|t| t.calendar_hour()).collect();
        if hour_buckets.len() >= MIN_HOUR_BUCKETS {
            let hourly = distribution(history.timestamps().map(|t| t.hour_of_day() as usize), 24);
            let strength = cyclical_strength(&hourly);
            if strength > settings.cyclical_threshold {
                patterns.push(Self::cycle(
                    history,
                    "daily",
                    "hour_of_day",
                    (0.0, 23.0),
                    strength,
                    hour_buckets.len() as f64,
                    hourly,
                ));
            }
        }

        let day_buckets: HashSet<_> = history.timestamps().map(|t| t.calendar_day()).collect();
        if day_buckets.len() >= MIN_DAY_BUCKETS {
            let weekly = distribution(history.timestamps().map(|t| t.day_of_week() as usize), 7);
            let strength = cyclical_strength(&weekly);
            if strength > settings.cyclical_threshold {
                patterns.push(Self::cycle(
                    history,
                    "weekly",
                    "day_of_week",
                    (0.0, 6.0),
                    strength,
                    day_buckets.len() as f64 / 7.0,
                    weekly,
                ));
            }
        }

        patterns
    }

    fn cycle(
        history: &PreparedHistory,
        period: &str,
        variable: &str,
        range: (f64, f64),
        strength: f64,
        frequency: f64,
        distribution: Vec<f64>,
    ) -> IdentifiedPattern {
        let description = match period {
            "daily" => "Daily decision-making cycle detected",
            _ => "Weekly decision-making cycle detected",
        };
        IdentifiedPattern::new(PatternType::Temporal, description, strength, frequency)
            .with_context(
                history
                    .context()
                    .with_factor("time_pattern", period)
                    .with_factor("distribution", distribution)
                    .with_metric("cyclical_strength", strength),
            )
            .with_predictive_value(clamp_unit(strength * PREDICTIVE_FACTOR))
            .with_variable(
                PatternVariable::numeric(variable, strength, strength).with_range(range.0, range.1),
            )
    }

    /// Linear trends of each tracked field against decision order.
    pub fn trends(history: &PreparedHistory) -> Vec<IdentifiedPattern> {
        TREND_FIELDS
            .iter()
            .filter_map(|&field| {
                let values = history.values(field);
                if values.len() < TREND_MIN_SAMPLES {
                    return None;
                }
                let points: Vec<(f64, f64)> = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i as f64, *v))
                    .collect();
                let fit = linear_regression(&points);
                if fit.slope.abs() <= TREND_MIN_SLOPE || fit.r_squared <= TREND_MIN_R_SQUARED {
                    return None;
                }

                let direction = if fit.slope > 0.0 { "increasing" } else { "decreasing" };
                let (low, high) = min_max(&values).unwrap_or((0.0, 1.0));
                let signed_fit = fit.r_squared.copysign(fit.slope);

                Some(
                    IdentifiedPattern::new(
                        PatternType::Temporal,
                        format!("{} shows {} trend over time", field, direction),
                        fit.r_squared,
                        values.len() as f64,
                    )
                    .with_context(
                        history
                            .context()
                            .with_factor("trend_direction", direction)
                            .with_metric("slope", fit.slope)
                            .with_metric("r_squared", fit.r_squared),
                    )
                    .with_predictive_value(clamp_unit(fit.r_squared * PREDICTIVE_FACTOR))
                    .with_variable(
                        PatternVariable::numeric(
                            field.as_str(),
                            clamp_unit(fit.slope.abs()),
                            signed_fit,
                        )
                        .with_range(low, high),
                    ),
                )
            })
            .collect()
    }
}

impl PatternDetector for TemporalDetector {
    fn pattern_type(&self) -> PatternType {
        PatternType::Temporal
    }

    fn detect(
        &self,
        history: &PreparedHistory,
        settings: &PatternSettings,
    ) -> Vec<IdentifiedPattern> {
        let mut patterns = Self::cycles(history, settings);
        patterns.extend(Self::trends(history));
        patterns
    }
}
