//! Error types for the sensitivity analysis.
//!
//! Only structurally invalid input is fatal: an unknown metric name fails
//! the call before any simulation work begins. Per-sample simulation
//! failures never surface here — the sweep records NaN for the affected
//! cells and continues.

use thiserror::Error;

use crate::store::error::StoreError;

#[derive(Error, Debug)]
pub enum SensitivityError {
    #[error("unknown signaling metric '{0}', expected 'amplitude', 'duration' or 'integral'")]
    InvalidMetric(String),
    #[error("failed to access fitted parameter sets")]
    Store(#[from] StoreError),
    #[error("failed to read or write the coefficient artifact: {0}")]
    ArtifactIo(#[from] std::io::Error),
    #[error("malformed coefficient artifact: {0}")]
    ArtifactFormat(#[from] serde_json::Error),
    #[error("coefficient artifact has the wrong shape")]
    ArtifactShape(#[from] ndarray::ShapeError),
}
