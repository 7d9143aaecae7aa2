//! Single-reaction perturbation runs.
//!
//! A perturbation run scales one reaction's flux by a fixed rate, leaves
//! every other flux untouched and re-simulates the network. The
//! perturbation context lives only for the duration of the call and is
//! handed to the model as an explicit argument, so simulations never share
//! mutable state.

use ndarray::Array1;

use crate::model::{
    error::SimulationFailure,
    network::{PerturbationVector, ReactionNetwork},
    trajectories::ConditionTrajectories,
};

/// Re-simulates the network with reaction `reaction_index` scaled by `rate`.
///
/// Returns trajectories for every (observable, condition) pair, or the
/// model's failure when the steady-state search does not converge or any
/// condition's trajectory stops short of the final time point. Callers
/// recover from failures by recording NaN; nothing is retried.
pub fn run_perturbed<M: ReactionNetwork>(
    model: &M,
    reaction_index: usize,
    rate: f64,
    parameters: &Array1<f64>,
    initial_state: &Array1<f64>,
) -> Result<ConditionTrajectories, SimulationFailure> {
    let perturbation = PerturbationVector::single(model.num_reactions(), reaction_index, rate);
    model.simulate(parameters, initial_state, &perturbation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Records the perturbation it was called with.
    struct EchoModel {
        observables: Vec<String>,
        conditions: Vec<String>,
    }

    impl EchoModel {
        fn new() -> Self {
            Self {
                observables: vec!["response".to_string()],
                conditions: vec!["stimulus".to_string()],
            }
        }
    }

    impl ReactionNetwork for EchoModel {
        fn num_reactions(&self) -> usize {
            4
        }

        fn observables(&self) -> &[String] {
            &self.observables
        }

        fn conditions(&self) -> &[String] {
            &self.conditions
        }

        fn simulate(
            &self,
            _parameters: &Array1<f64>,
            _initial_state: &Array1<f64>,
            perturbation: &PerturbationVector,
        ) -> Result<ConditionTrajectories, SimulationFailure> {
            // expose the received factors as a flat trajectory
            let factors: Vec<f64> = (0..perturbation.len())
                .map(|j| perturbation.factor(j))
                .collect();
            let mut trajectories = ConditionTrajectories::new(
                Array1::from_iter((0..factors.len()).map(|t| t as f64)),
                1,
                1,
            );
            trajectories.set_series(0, 0, &factors);
            Ok(trajectories)
        }
    }

    #[test]
    fn test_perturbation_reaches_the_model() {
        let model = EchoModel::new();
        let trajectories =
            run_perturbed(&model, 2, 1.01, &array![1.0], &array![0.0]).unwrap();
        assert_eq!(
            trajectories.series(0, 0).to_vec(),
            vec![1.0, 1.0, 1.01, 1.0]
        );
    }
}
