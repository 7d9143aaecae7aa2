//! Reaction Network Capability
//!
//! This module defines the [`ReactionNetwork`] trait, the seam between the
//! sensitivity engine and a concrete ODE model, together with the
//! [`PerturbationVector`] that scales individual reaction fluxes during a
//! simulation.
//!
//! # Key Components
//!
//! - [`ReactionNetwork`]: exposes the network dimensions (reactions,
//!   observables, experimental conditions) and a `simulate` entry point
//! - [`PerturbationVector`]: one multiplicative factor per reaction slot,
//!   passed explicitly into every `simulate` call
//!
//! # Perturbation convention
//!
//! Reaction fluxes are indexed `0..num_reactions`. Slot 0 is reserved as the
//! unperturbed reference: the sweep driver forces its factor to exactly 1.0,
//! so a run perturbing slot 0 is the baseline simulation. Models are free to
//! leave slot 0 unconsumed (1-based flux numbering) or to attach a flux to
//! it and accept that its sensitivity is never measured.

use ndarray::Array1;

use super::{error::SimulationFailure, trajectories::ConditionTrajectories};

/// Multiplicative perturbation factors, one per reaction slot.
///
/// Constructed fresh for every (parameter set, reaction) pair and consumed
/// by the model's right-hand side during integration. Passing the vector as
/// an explicit argument keeps concurrent simulations isolated from each
/// other; there is no shared perturbation state.
#[derive(Debug, Clone, PartialEq)]
pub struct PerturbationVector(Vec<f64>);

impl PerturbationVector {
    /// All factors 1.0: the unperturbed network.
    pub fn identity(num_reactions: usize) -> Self {
        Self(vec![1.0; num_reactions])
    }

    /// All factors 1.0 except `reaction_index`, which is set to `rate`.
    pub fn single(num_reactions: usize, reaction_index: usize, rate: f64) -> Self {
        let mut factors = vec![1.0; num_reactions];
        factors[reaction_index] = rate;
        Self(factors)
    }

    /// The factor applied to reaction `index`.
    #[inline]
    pub fn factor(&self, index: usize) -> f64 {
        self.0[index]
    }

    /// Number of reaction slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every factor is exactly 1.0.
    pub fn is_identity(&self) -> bool {
        self.0.iter().all(|&f| f == 1.0)
    }
}

/// An ODE-based signaling network that can be re-simulated under a
/// perturbation of a single reaction rate.
///
/// Implementations own the time grid, the observable projections and the
/// set of experimental conditions; the sensitivity engine only sees the
/// resulting per-observable, per-condition trajectories.
pub trait ReactionNetwork {
    /// Number of reaction slots in the network, including the reserved
    /// baseline slot 0.
    fn num_reactions(&self) -> usize;

    /// Names of the derived quantities recorded from each simulation.
    fn observables(&self) -> &[String];

    /// Names of the experimental conditions simulated per run.
    fn conditions(&self) -> &[String];

    /// Simulates the network for every condition.
    ///
    /// # Arguments
    ///
    /// * `parameters` - kinetic parameter values
    /// * `initial_state` - species concentrations to start from
    /// * `perturbation` - flux scaling factors consumed by the right-hand side
    ///
    /// # Returns
    ///
    /// Trajectories for every (observable, condition) pair over the full
    /// time grid, or a [`SimulationFailure`] if integration did not reach
    /// the final time point or the pre-stimulation steady state search did
    /// not converge.
    fn simulate(
        &self,
        parameters: &Array1<f64>,
        initial_state: &Array1<f64>,
        perturbation: &PerturbationVector,
    ) -> Result<ConditionTrajectories, SimulationFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_vector() {
        let perturbation = PerturbationVector::identity(4);
        assert_eq!(perturbation.len(), 4);
        assert!(perturbation.is_identity());
    }

    #[test]
    fn test_single_perturbation() {
        let perturbation = PerturbationVector::single(5, 3, 1.01);
        assert_eq!(perturbation.factor(3), 1.01);
        assert!(!perturbation.is_identity());

        let untouched = (0..5).filter(|&j| j != 3).map(|j| perturbation.factor(j));
        for factor in untouched {
            assert_eq!(factor, 1.0);
        }
    }
}
