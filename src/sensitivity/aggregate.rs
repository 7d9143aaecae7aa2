//! Reduction of raw metric values into sensitivity coefficients.
//!
//! This is a pure, stateless pass over the metric tensor: no model calls,
//! no I/O. Every cell is compared against the unperturbed baseline in
//! reaction slot 0 of the same parameter set and reduced to a discrete
//! logarithmic elasticity.

use ndarray::Array4;

use super::tensor::{SensitivityCoefficientTensor, SignalingMetricTensor};

/// Derives the coefficient tensor from raw metric values.
///
/// Per cell, against the baseline column (reaction index 0):
///
/// 1. NaN baseline or NaN perturbed value → NaN (failed simulation
///    propagates totally)
/// 2. metrics numerically indistinguishable (`|Δ| < epsilon`) or of
///    opposite sign → 0.0
/// 3. otherwise `ln(perturbed / baseline) / ln(rate)`
///
/// `rate` is the multiplicative perturbation applied during the sweep and
/// `epsilon` the indistinguishability threshold (1e-9 in the reference
/// protocol, see [`SweepSetup`](super::sweep::SweepSetup)).
pub fn aggregate(
    metrics: &SignalingMetricTensor,
    rate: f64,
    epsilon: f64,
) -> SensitivityCoefficientTensor {
    let [n_sets, n_reactions, n_observables, n_conditions] = metrics.shape();
    let mut coefficients =
        Array4::from_elem((n_sets, n_reactions, n_observables, n_conditions), f64::NAN);

    for i in 0..n_sets {
        for j in 0..n_reactions {
            for k in 0..n_observables {
                for l in 0..n_conditions {
                    let baseline = metrics.get(i, 0, k, l);
                    let perturbed = metrics.get(i, j, k, l);
                    coefficients[[i, j, k, l]] = elasticity(baseline, perturbed, rate, epsilon);
                }
            }
        }
    }

    SensitivityCoefficientTensor::new(coefficients)
}

/// Discrete logarithmic elasticity of one metric value pair.
fn elasticity(baseline: f64, perturbed: f64, rate: f64, epsilon: f64) -> f64 {
    if baseline.is_nan() || perturbed.is_nan() {
        return f64::NAN;
    }
    if (perturbed - baseline).abs() < epsilon || perturbed / baseline < 0.0 {
        return 0.0;
    }
    (perturbed / baseline).ln() / rate.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RATE: f64 = 1.01;
    const EPSILON: f64 = 1e-9;

    fn tensor_with(baseline: f64, perturbed: f64) -> SignalingMetricTensor {
        let mut metrics = SignalingMetricTensor::nan((1, 2, 1, 1));
        metrics.set(0, 0, 0, 0, baseline);
        metrics.set(0, 1, 0, 0, perturbed);
        metrics
    }

    #[test]
    fn test_baseline_against_itself_is_zero() {
        let metrics = tensor_with(1.0, 1.5);
        let coefficients = aggregate(&metrics, RATE, EPSILON);
        // the baseline column compares against itself and must come out
        // exactly 0.0, never NaN
        assert_eq!(coefficients.get(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_equal_metrics_yield_zero() {
        let metrics = tensor_with(1.0, 1.0);
        let coefficients = aggregate(&metrics, RATE, EPSILON);
        let value = coefficients.get(0, 1, 0, 0);
        assert_eq!(value, 0.0);
        assert!(!value.is_nan() && value.is_finite());
    }

    #[test]
    fn test_sign_flip_yields_zero() {
        let metrics = tensor_with(2.0, -8.0);
        let coefficients = aggregate(&metrics, RATE, EPSILON);
        assert_eq!(coefficients.get(0, 1, 0, 0), 0.0);
    }

    #[test]
    fn test_nan_propagates_totally() {
        let metrics = tensor_with(f64::NAN, 2.0);
        let coefficients = aggregate(&metrics, RATE, EPSILON);
        assert!(coefficients.get(0, 1, 0, 0).is_nan());

        let metrics = tensor_with(2.0, f64::NAN);
        let coefficients = aggregate(&metrics, RATE, EPSILON);
        assert!(coefficients.get(0, 1, 0, 0).is_nan());
        // the baseline column itself stays well-defined
        assert_eq!(coefficients.get(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_elasticity_value() {
        // ln(2.2 / 2.0) / ln(1.01) = ln(1.1) / ln(1.01)
        let metrics = tensor_with(2.0, 2.2);
        let coefficients = aggregate(&metrics, RATE, EPSILON);
        assert_relative_eq!(
            coefficients.get(0, 1, 0, 0),
            (1.1f64).ln() / (1.01f64).ln(),
            epsilon = 1e-6
        );
        assert_relative_eq!(coefficients.get(0, 1, 0, 0), 9.566, epsilon = 1e-3);
    }

    #[test]
    fn test_unit_ratio_matches_epsilon_branch() {
        // ln(1/1)/ln(1.01) = 0 through the log formula as well; both paths
        // must agree on exactly 0.0
        assert_eq!(elasticity(1.0, 1.0, RATE, EPSILON), 0.0);
        assert_eq!(elasticity(1.0, 1.0, RATE, 0.0), 0.0);
    }

    #[test]
    fn test_aggregate_is_pure_and_idempotent() {
        let mut metrics = SignalingMetricTensor::nan((2, 3, 1, 1));
        for i in 0..2 {
            metrics.set(i, 0, 0, 0, 1.0 + i as f64);
            metrics.set(i, 1, 0, 0, 1.1 + i as f64);
        }
        // reaction 2 left NaN: simulated failure

        let first = aggregate(&metrics, RATE, EPSILON);
        let second = aggregate(&metrics, RATE, EPSILON);

        assert_eq!(first.shape(), second.shape());
        for (a, b) in first.values().iter().zip(second.values().iter()) {
            assert!(a.to_bits() == b.to_bits());
        }
    }
}
