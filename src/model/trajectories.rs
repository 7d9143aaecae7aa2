//! Per-condition trajectory containers.
//!
//! A successful simulation produces one time series per (observable,
//! condition) pair over a shared uniform time grid. The container is laid
//! out as `[observable, time, condition]` so that a single observable's
//! response under one condition is a contiguous row view, which is what the
//! metric evaluator consumes.

use ndarray::{Array1, Array3, ArrayView1};

/// Response trajectories for every observable under every condition.
#[derive(Debug, Clone)]
pub struct ConditionTrajectories {
    /// Shared time grid, uniform spacing.
    time: Array1<f64>,
    /// Trajectory values, indexed `[observable, time, condition]`.
    values: Array3<f64>,
}

impl ConditionTrajectories {
    /// Creates a zero-filled container for `num_observables` ×
    /// `num_conditions` series over `time`.
    pub fn new(time: Array1<f64>, num_observables: usize, num_conditions: usize) -> Self {
        let num_timepoints = time.len();
        Self {
            time,
            values: Array3::zeros((num_observables, num_timepoints, num_conditions)),
        }
    }

    /// The shared time grid.
    pub fn time(&self) -> &Array1<f64> {
        &self.time
    }

    /// Number of observables.
    pub fn num_observables(&self) -> usize {
        self.values.shape()[0]
    }

    /// Number of conditions.
    pub fn num_conditions(&self) -> usize {
        self.values.shape()[2]
    }

    /// The time series of observable `observable` under condition `condition`.
    pub fn series(&self, observable: usize, condition: usize) -> ArrayView1<f64> {
        self.values
            .slice(ndarray::s![observable, .., condition])
    }

    /// Overwrites the series of observable `observable` under condition
    /// `condition` with `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not match the time grid length.
    pub fn set_series(&mut self, observable: usize, condition: usize, values: &[f64]) {
        assert_eq!(values.len(), self.time.len(), "series length mismatch");
        self.values
            .slice_mut(ndarray::s![observable, .., condition])
            .assign(&ArrayView1::from(values));
    }

    /// Whether every stored value is finite.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
