//! Persisted coefficient artifacts and the cached analysis entry point.
//!
//! A finished sweep is expensive, so its coefficient tensor is persisted
//! under `<output>/<metric>/sensitivity_coefficients.json`. The artifact is
//! authoritative: if it exists, [`run_analysis`] returns it without running
//! a single simulation. Delete the file to force recomputation.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::model::network::ReactionNetwork;
use crate::store::paramset::ParamsetStore;

use super::error::SensitivityError;
use super::metric::SignalingMetric;
use super::sweep::{run_sweep, SweepSetup};
use super::tensor::{SensitivityCoefficientTensor, TensorArtifact};

const COEFFICIENTS_FILE: &str = "sensitivity_coefficients.json";

/// Location of the artifact for `metric` under `output_dir`.
pub fn coefficients_path(output_dir: &Path, metric: SignalingMetric) -> PathBuf {
    output_dir.join(metric.to_string()).join(COEFFICIENTS_FILE)
}

/// Loads a persisted coefficient tensor.
pub fn load_coefficients(path: &Path) -> Result<SensitivityCoefficientTensor, SensitivityError> {
    let file = File::open(path)?;
    let artifact: TensorArtifact = serde_json::from_reader(file)?;
    Ok(artifact.try_into()?)
}

/// Persists a coefficient tensor, creating parent directories as needed.
pub fn save_coefficients(
    path: &Path,
    tensor: &SensitivityCoefficientTensor,
) -> Result<(), SensitivityError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &TensorArtifact::from(tensor))?;
    Ok(())
}

/// Computes (or restores) the sensitivity coefficients for `metric_name`.
///
/// The metric name is validated first; an unknown name fails the call
/// before any parameter set is listed or any simulation is attempted. When
/// no artifact exists the full sweep runs and its result is persisted
/// before returning.
pub fn run_analysis<M: ReactionNetwork, S: ParamsetStore>(
    model: &M,
    store: &S,
    metric_name: &str,
    output_dir: &Path,
    setup: &SweepSetup,
) -> Result<SensitivityCoefficientTensor, SensitivityError> {
    let metric: SignalingMetric = metric_name.parse()?;

    let path = coefficients_path(output_dir, metric);
    if path.is_file() {
        log::info!("restoring cached coefficients from {}", path.display());
        return load_coefficients(&path);
    }

    let tensor = run_sweep(model, store, metric, model.num_reactions(), setup)?;
    save_coefficients(&path, &tensor)?;
    Ok(tensor)
}
