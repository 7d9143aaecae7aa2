//! Parameter set records and the store trait.

use ndarray::Array1;

use super::error::StoreError;

/// One fitted candidate solution: kinetic parameters paired with the
/// initial species concentrations they were estimated against.
///
/// Read-only for the duration of one parameter set's sweep; the engine only
/// ever mutates perturbation copies, never the record itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Paramset {
    pub parameters: Array1<f64>,
    pub initial_state: Array1<f64>,
}

/// A source of fitted parameter sets from prior optimization runs.
pub trait ParamsetStore {
    /// Identifiers of all runs with a completed optimization, in ascending
    /// order. Incomplete runs are not listed.
    fn list_paramsets(&self) -> Result<Vec<u32>, StoreError>;

    /// Loads the best candidate of run `id`.
    fn load_paramset(&self, id: u32) -> Result<Paramset, StoreError>;
}
