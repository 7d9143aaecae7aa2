//! Signaling Response Metrics
//!
//! This module reduces a single response trajectory to a scalar summary.
//! Three metrics are supported:
//!
//! - [`SignalingMetric::Amplitude`]: the maximum value attained
//! - [`SignalingMetric::Duration`]: the time index at which the response
//!   decays to 10% of its maximum
//! - [`SignalingMetric::Integral`]: the integral over the observation window
//!
//! Metric selection is a closed enum, so dispatch is exhaustive at compile
//! time; the string surface (CLI, cache keys) goes through [`FromStr`] and
//! rejects unknown names before any simulation work starts.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::error::SensitivityError;

/// Fraction of the maximum below which a response counts as decayed.
const DECAY_THRESHOLD: f64 = 0.1;

/// A scalar summary of one response trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalingMetric {
    Amplitude,
    Duration,
    Integral,
}

impl SignalingMetric {
    /// Computes the metric over one observable/condition trajectory.
    ///
    /// The trajectory is assumed to live on a uniform unit time grid; the
    /// duration metric returns a grid index and the integral uses unit
    /// spacing.
    pub fn compute(&self, trajectory: ArrayView1<f64>) -> f64 {
        match self {
            SignalingMetric::Amplitude => amplitude(trajectory),
            SignalingMetric::Duration => duration(trajectory),
            SignalingMetric::Integral => integral(trajectory),
        }
    }
}

impl fmt::Display for SignalingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalingMetric::Amplitude => write!(f, "amplitude"),
            SignalingMetric::Duration => write!(f, "duration"),
            SignalingMetric::Integral => write!(f, "integral"),
        }
    }
}

impl FromStr for SignalingMetric {
    type Err = SensitivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amplitude" => Ok(SignalingMetric::Amplitude),
            "duration" => Ok(SignalingMetric::Duration),
            "integral" => Ok(SignalingMetric::Integral),
            other => Err(SensitivityError::InvalidMetric(other.to_string())),
        }
    }
}

/// Index of the first occurrence of the maximum value.
fn argmax(values: impl Iterator<Item = f64>) -> usize {
    values
        .enumerate()
        .max_by_key(|&(index, value)| (OrderedFloat(value), Reverse(index)))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// The maximum value attained over the trajectory.
fn amplitude(trajectory: ArrayView1<f64>) -> f64 {
    trajectory
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

/// The first time index, at or after the peak, at which the response has
/// decayed to at most 10% of its maximum.
///
/// Samples still above the 10% threshold are masked to −∞ after shifting
/// the trajectory down by the threshold, so the argmax of the suffix
/// starting at the peak lands on the decay point. If the series never
/// decays this returns the peak index itself. Assumes a unimodal response;
/// for multi-peaked series the result is not meaningful.
fn duration(trajectory: ArrayView1<f64>) -> f64 {
    let maximum = amplitude(trajectory);
    let t_max = argmax(trajectory.iter().copied());

    let shifted = trajectory.iter().map(|&value| {
        let remainder = value - DECAY_THRESHOLD * maximum;
        if remainder > 0.0 {
            f64::NEG_INFINITY
        } else {
            remainder
        }
    });

    (argmax(shifted.skip(t_max)) + t_max) as f64
}

/// Composite Simpson's rule over the trajectory, unit spacing.
///
/// An odd number of intervals is closed with a trapezoid over the final
/// interval.
fn integral(trajectory: ArrayView1<f64>) -> f64 {
    let n = trajectory.len();
    if n < 2 {
        return 0.0;
    }
    if n == 2 {
        return (trajectory[0] + trajectory[1]) / 2.0;
    }

    let intervals = n - 1;
    // last index covered by the Simpson part
    let m = if intervals % 2 == 0 { n - 1 } else { n - 2 };

    let mut sum = trajectory[0] + trajectory[m];
    for i in 1..m {
        sum += if i % 2 == 1 { 4.0 } else { 2.0 } * trajectory[i];
    }
    let mut result = sum / 3.0;

    if intervals % 2 == 1 {
        result += (trajectory[n - 2] + trajectory[n - 1]) / 2.0;
    }

    result
}
