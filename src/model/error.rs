//! Simulation failure types.
//!
//! A failed simulation is not fatal to a sensitivity sweep: the driver
//! records NaN for the affected cells and moves on. These variants only
//! describe *why* a single perturbation run produced no usable trajectory.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationFailure {
    #[error("steady state was not reached before stimulation")]
    SteadyStateNotReached,
    #[error("integration stopped before the final time point under condition '{0}'")]
    IncompleteTrajectory(String),
    #[error("state became non-finite under condition '{0}'")]
    NonFiniteState(String),
    #[error("ODE solver error: {0}")]
    Solver(String),
}
