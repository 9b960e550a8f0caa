//! Descriptive statistics used by the detectors.

use tracing::debug;

use crate::domain::foundation::clamp_unit;

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; 0 for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Smallest and largest value, or `None` for an empty slice.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Ordinary least-squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, clamped to [0, 1].
    pub r_squared: f64,
}

impl LinearFit {
    const FLAT: Self = Self {
        slope: 0.0,
        intercept: 0.0,
        r_squared: 0.0,
    };
}

/// Sums of squared deviations below this, per point, count as constant.
const CONSTANT_TOLERANCE: f64 = 1e-12;

/// Centred sums `(Σ(x−x̄)², Σ(y−ȳ)², Σ(x−x̄)(y−ȳ))` with the means.
fn centred_sums(pairs: &[(f64, f64)]) -> (f64, f64, f64, f64, f64) {
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / pairs.len() as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / pairs.len() as f64;

    let (sxx, syy, sxy) = pairs.iter().fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
    });
    (mean_x, mean_y, sxx, syy, sxy)
}

fn is_constant(sum_of_squares: f64, n: usize) -> bool {
    sum_of_squares <= CONSTANT_TOLERANCE * n as f64
}

/// Fits a line through `points`.
///
/// Fewer than two points, or all x equal, give a flat fit with R² = 0.
pub fn linear_regression(points: &[(f64, f64)]) -> LinearFit {
    if points.len() < 2 {
        return LinearFit::FLAT;
    }

    let (mean_x, mean_y, sxx, syy, sxy) = centred_sums(points);
    if is_constant(sxx, points.len()) {
        debug!(points = points.len(), "Regression denominator is zero, using flat fit");
        return LinearFit::FLAT;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    let r_squared = if is_constant(syy, points.len()) {
        0.0
    } else {
        clamp_unit(1.0 - ss_res / syy)
    };

    LinearFit {
        slope,
        intercept,
        r_squared,
    }
}

/// Pearson correlation coefficient, clamped to [-1, 1].
///
/// Returns 0 when either variable is constant.
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return 0.0;
    }

    let (_, _, sxx, syy, sxy) = centred_sums(pairs);
    if is_constant(sxx, pairs.len()) || is_constant(syy, pairs.len()) {
        return 0.0;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Heuristic significance proxy `max(0.001, 1 - |r|)`.
///
/// Not a hypothesis test; it only shrinks as |r| grows.
pub fn heuristic_p_value(r: f64) -> f64 {
    (1.0 - r.abs()).max(0.001)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mean_and_variance_of_known_values() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(variance(&values), 4.0);
    }

    #[test]
    fn empty_slices_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn min_max_finds_extremes() {
        assert_eq!(min_max(&[0.4, -1.0, 3.0]), Some((-1.0, 3.0)));
    }

    #[test]
    fn regression_recovers_exact_line() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 0.5 * i as f64 + 1.0)).collect();
        let fit = linear_regression(&points);

        assert!((fit.slope - 0.5).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn regression_of_constant_y_has_zero_r_squared() {
        let points: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 0.3)).collect();
        let fit = linear_regression(&points);

        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 0.0);
    }

    #[test]
    fn regression_with_repeated_x_is_flat() {
        let fit = linear_regression(&[(1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(fit, LinearFit::FLAT);
    }

    #[test]
    fn pearson_of_linear_relation_is_one() {
        let pairs: Vec<(f64, f64)> = (0..6).map(|i| (i as f64, 2.0 * i as f64)).collect();
        assert!((pearson(&pairs) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_inverse_relation_is_minus_one() {
        let pairs: Vec<(f64, f64)> = (0..6).map(|i| (i as f64, 1.0 - i as f64)).collect();
        assert!((pearson(&pairs) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_constant_is_zero() {
        assert_eq!(pearson(&[(1.0, 0.2), (2.0, 0.2), (3.0, 0.2)]), 0.0);
    }

    #[test]
    fn pearson_of_repeated_pair_is_zero() {
        assert_eq!(pearson(&[(0.3, 0.6); 7]), 0.0);
        assert_eq!(pearson(&[(0.1, 0.2); 10]), 0.0);
        assert_eq!(pearson(&[(0.3, 0.3); 11]), 0.0);
    }

    #[test]
    fn regression_with_repeated_fractional_x_is_flat() {
        let points: Vec<(f64, f64)> = (0..9).map(|i| (0.1, i as f64)).collect();
        assert_eq!(linear_regression(&points), LinearFit::FLAT);
    }

    #[test]
    fn p_value_is_floored() {
        assert_eq!(heuristic_p_value(1.0), 0.001);
        assert!((heuristic_p_value(-0.4) - 0.6).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn pearson_is_symmetric(
            pairs in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 3..40)
        ) {
            let swapped: Vec<(f64, f64)> = pairs.iter().map(|(x, y)| (*y, *x)).collect();
            prop_assert!((pearson(&pairs) - pearson(&swapped)).abs() < 1e-9);
        }

        #[test]
        fn pearson_stays_in_range(
            pairs in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 3..40)
        ) {
            let r = pearson(&pairs);
            prop_assert!((-1.0..=1.0).contains(&r));
        }
    }
}
