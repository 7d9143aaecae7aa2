//! Error types for parameter set loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("parameter set {0} has no generation record and is not a completed run")]
    MissingOptimizationResult(u32),
    #[error("parameter set {id}: fitted vector has length {found}, expected {expected}")]
    FittedVectorLength {
        id: u32,
        expected: usize,
        found: usize,
    },
    #[error("search index {index} is out of bounds for a vector of length {len}")]
    SearchIndexOutOfBounds { index: usize, len: usize },
    #[error("failed to read the results directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}
