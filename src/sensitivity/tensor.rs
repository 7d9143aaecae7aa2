//! Metric and coefficient tensor types.
//!
//! Both tensors share the shape `[parameter set, reaction, observable,
//! condition]`. NaN marks cells whose simulation failed; reaction index 0
//! along the second axis always holds the unperturbed baseline.
//!
//! The coefficient tensor can be persisted as a JSON artifact. JSON has no
//! NaN literal, so failed cells are written as `null` and restored to NaN
//! on load.

use ndarray::Array4;
use serde::{Deserialize, Serialize};

/// Raw signaling metric values collected during a sweep.
///
/// Filled cell by cell as simulations complete and discarded once the
/// coefficients have been derived.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalingMetricTensor(Array4<f64>);

impl SignalingMetricTensor {
    /// Allocates a NaN-prefilled tensor of the given shape.
    pub fn nan(shape: (usize, usize, usize, usize)) -> Self {
        Self(Array4::from_elem(shape, f64::NAN))
    }

    /// Stores one metric value.
    pub fn set(
        &mut self,
        paramset: usize,
        reaction: usize,
        observable: usize,
        condition: usize,
        value: f64,
    ) {
        self.0[[paramset, reaction, observable, condition]] = value;
    }

    /// Reads one metric value. Failed cells read as NaN.
    pub fn get(
        &self,
        paramset: usize,
        reaction: usize,
        observable: usize,
        condition: usize,
    ) -> f64 {
        self.0[[paramset, reaction, observable, condition]]
    }

    /// `[num_paramsets, num_reactions, num_observables, num_conditions]`
    pub fn shape(&self) -> [usize; 4] {
        let shape = self.0.shape();
        [shape[0], shape[1], shape[2], shape[3]]
    }

    /// The underlying array.
    pub fn values(&self) -> &Array4<f64> {
        &self.0
    }
}

/// Normalized sensitivity coefficients derived from a metric tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityCoefficientTensor(Array4<f64>);

impl SensitivityCoefficientTensor {
    /// Wraps a coefficient array.
    pub fn new(values: Array4<f64>) -> Self {
        Self(values)
    }

    /// Reads one coefficient. Cells whose baseline or perturbed simulation
    /// failed read as NaN.
    pub fn get(
        &self,
        paramset: usize,
        reaction: usize,
        observable: usize,
        condition: usize,
    ) -> f64 {
        self.0[[paramset, reaction, observable, condition]]
    }

    /// `[num_paramsets, num_reactions, num_observables, num_conditions]`
    pub fn shape(&self) -> [usize; 4] {
        let shape = self.0.shape();
        [shape[0], shape[1], shape[2], shape[3]]
    }

    /// Whether the first dimension is empty (no completed parameter sets).
    pub fn is_empty(&self) -> bool {
        self.0.shape()[0] == 0
    }

    /// The underlying array.
    pub fn values(&self) -> &Array4<f64> {
        &self.0
    }
}

/// Serializable form of a coefficient tensor.
///
/// NaN cells are encoded as `None`, which serde_json writes as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorArtifact {
    shape: [usize; 4],
    data: Vec<Option<f64>>,
}

impl From<&SensitivityCoefficientTensor> for TensorArtifact {
    fn from(tensor: &SensitivityCoefficientTensor) -> Self {
        Self {
            shape: tensor.shape(),
            data: tensor
                .0
                .iter()
                .map(|&v| if v.is_nan() { None } else { Some(v) })
                .collect(),
        }
    }
}

impl TryFrom<TensorArtifact> for SensitivityCoefficientTensor {
    type Error = ndarray::ShapeError;

    fn try_from(artifact: TensorArtifact) -> Result<Self, Self::Error> {
        let data = artifact
            .data
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        let [n_sets, n_reactions, n_observables, n_conditions] = artifact.shape;
        Ok(Self(Array4::from_shape_vec(
            (n_sets, n_reactions, n_observables, n_conditions),
            data,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_prefill() {
        let tensor = SignalingMetricTensor::nan((2, 3, 1, 1));
        assert_eq!(tensor.shape(), [2, 3, 1, 1]);
        assert!(tensor.get(1, 2, 0, 0).is_nan());
    }

    #[test]
    fn test_artifact_round_trip() {
        let mut values = Array4::from_elem((1, 2, 1, 2), 0.5);
        values[[0, 1, 0, 1]] = f64::NAN;
        let tensor = SensitivityCoefficientTensor::new(values);

        let artifact = TensorArtifact::from(&tensor);
        let json = serde_json::to_string(&artifact).unwrap();
        let restored: SensitivityCoefficientTensor =
            serde_json::from_str::<TensorArtifact>(&json)
                .unwrap()
                .try_into()
                .unwrap();

        assert_eq!(restored.shape(), tensor.shape());
        assert_eq!(restored.get(0, 0, 0, 0), 0.5);
        assert!(restored.get(0, 1, 0, 1).is_nan());
    }
}
