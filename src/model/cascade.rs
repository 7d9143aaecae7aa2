//! Reference three-tier kinase cascade.
//!
//! A compact signaling model used as the bundled [`ReactionNetwork`]:
//! a ligand stimulus activates a kinase cascade (M3K → M2K → MAPK) with
//! negative feedback from active MAPK onto M3K deactivation. Two
//! experimental conditions are simulated per run, a decaying pulse stimulus
//! and a sustained one, which produce transient and plateauing responses
//! respectively.
//!
//! The simulation protocol matches the sensitivity engine's expectations:
//! the network is first relaxed to its pre-stimulation steady state
//! (repeated integration from the unstimulated state until the end state
//! stops moving, bounded rounds), then each condition is integrated over a
//! uniform unit time grid and projected onto the phosphorylated observables.
//!
//! Flux slots are 1-based; slot 0 of the perturbation vector is the
//! reserved baseline slot and is never consumed by the right-hand side.

use anyhow::Error;
use ndarray::Array1;
use peroxide::fuga::{BasicODESolver, ODEProblem, ODESolver, RK5};

use super::error::SimulationFailure;
use super::network::{PerturbationVector, ReactionNetwork};
use super::trajectories::ConditionTrajectories;

/// Parameter vector indices.
pub mod param {
    /// M3K activation rate per unit stimulus
    pub const K_ACT3: usize = 0;
    /// M3K* deactivation rate
    pub const V_DEACT3: usize = 1;
    /// M2K activation rate per unit M3K*
    pub const K_ACT2: usize = 2;
    /// M2K* deactivation rate
    pub const V_DEACT2: usize = 3;
    /// MAPK activation rate per unit M2K*
    pub const K_ACT1: usize = 4;
    /// MAPK* deactivation rate
    pub const V_DEACT1: usize = 5;
    /// feedback strength of MAPK* on M3K* deactivation
    pub const K_FB: usize = 6;

    pub const LEN: usize = 7;
}

/// State vector indices.
pub mod species {
    pub const M3K: usize = 0;
    pub const M3K_P: usize = 1;
    pub const M2K: usize = 2;
    pub const M2K_P: usize = 3;
    pub const MAPK: usize = 4;
    pub const MAPK_P: usize = 5;

    pub const LEN: usize = 6;
}

/// An experimental stimulation scenario.
#[derive(Debug, Clone)]
struct Condition {
    name: String,
    /// stimulus strength at t = 0
    stimulus: f64,
    /// exponential decay rate of the stimulus
    decay: f64,
}

/// The bundled reference network.
#[derive(Debug, Clone)]
pub struct PhosphorylationCascade {
    observables: Vec<String>,
    conditions: Vec<Condition>,
    condition_names: Vec<String>,
    t_end: f64,
    dt: f64,
    steady_state_eps: f64,
    max_equilibration_rounds: usize,
}

impl Default for PhosphorylationCascade {
    fn default() -> Self {
        let conditions = vec![
            Condition {
                name: "pulse".to_string(),
                stimulus: 1.0,
                decay: 0.05,
            },
            Condition {
                name: "sustained".to_string(),
                stimulus: 1.0,
                decay: 0.0,
            },
        ];
        Self {
            observables: vec![
                "phosphorylated_m3k".to_string(),
                "phosphorylated_m2k".to_string(),
                "phosphorylated_mapk".to_string(),
            ],
            condition_names: conditions.iter().map(|c| c.name.clone()).collect(),
            conditions,
            t_end: 120.0,
            dt: 1.0,
            steady_state_eps: 1e-6,
            max_equilibration_rounds: 10,
        }
    }
}

impl PhosphorylationCascade {
    /// Nominal kinetic parameters.
    pub fn default_parameters() -> Array1<f64> {
        let mut parameters = Array1::zeros(param::LEN);
        parameters[param::K_ACT3] = 0.5;
        parameters[param::V_DEACT3] = 0.1;
        parameters[param::K_ACT2] = 1.0;
        parameters[param::V_DEACT2] = 0.3;
        parameters[param::K_ACT1] = 1.0;
        parameters[param::V_DEACT1] = 0.3;
        parameters[param::K_FB] = 2.0;
        parameters
    }

    /// Fully dephosphorylated initial state, one unit of each kinase.
    pub fn default_initial_state() -> Array1<f64> {
        let mut state = Array1::zeros(species::LEN);
        state[species::M3K] = 1.0;
        state[species::M2K] = 1.0;
        state[species::MAPK] = 1.0;
        state
    }

    fn num_timepoints(&self) -> usize {
        (self.t_end / self.dt).round() as usize + 1
    }

    fn integrate(&self, problem: &CascadeRhs, y0: &[f64]) -> Result<Vec<Vec<f64>>, Error> {
        let solver = BasicODESolver::new(RK5::default());
        let (_, y_out) = solver.solve(problem, (0.0, self.t_end), self.dt, y0)?;
        Ok(y_out)
    }

    /// Relaxes the unstimulated network until the end state stops moving.
    fn equilibrate(
        &self,
        parameters: &Array1<f64>,
        perturbation: &PerturbationVector,
        initial_state: &Array1<f64>,
    ) -> Result<Vec<f64>, SimulationFailure> {
        let problem = CascadeRhs {
            parameters,
            perturbation,
            stimulus: 0.0,
            decay: 0.0,
        };

        let mut state = initial_state.to_vec();
        for _ in 0..self.max_equilibration_rounds {
            let y_out = self
                .integrate(&problem, &state)
                .map_err(|e| SimulationFailure::Solver(e.to_string()))?;
            if y_out.len() < self.num_timepoints() {
                return Err(SimulationFailure::SteadyStateNotReached);
            }
            let last = y_out.last().expect("non-empty trajectory");
            if last.iter().any(|v| !v.is_finite()) {
                return Err(SimulationFailure::SteadyStateNotReached);
            }

            let movement = last
                .iter()
                .zip(&state)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            state = last.clone();
            if movement < self.steady_state_eps {
                return Ok(state);
            }
        }

        Err(SimulationFailure::SteadyStateNotReached)
    }
}

impl ReactionNetwork for PhosphorylationCascade {
    fn num_reactions(&self) -> usize {
        // six fluxes in slots 1..=6 plus the reserved baseline slot 0
        7
    }

    fn observables(&self) -> &[String] {
        &self.observables
    }

    fn conditions(&self) -> &[String] {
        &self.condition_names
    }

    fn simulate(
        &self,
        parameters: &Array1<f64>,
        initial_state: &Array1<f64>,
        perturbation: &PerturbationVector,
    ) -> Result<ConditionTrajectories, SimulationFailure> {
        let rested = self.equilibrate(parameters, perturbation, initial_state)?;

        let time = Array1::from_iter((0..self.num_timepoints()).map(|t| t as f64 * self.dt));
        let mut trajectories =
            ConditionTrajectories::new(time, self.observables.len(), self.conditions.len());

        for (l, condition) in self.conditions.iter().enumerate() {
            let problem = CascadeRhs {
                parameters,
                perturbation,
                stimulus: condition.stimulus,
                decay: condition.decay,
            };

            let y_out = self
                .integrate(&problem, &rested)
                .map_err(|e| SimulationFailure::Solver(e.to_string()))?;
            if y_out.len() < self.num_timepoints() {
                return Err(SimulationFailure::IncompleteTrajectory(
                    condition.name.clone(),
                ));
            }
            if y_out.iter().flatten().any(|v| !v.is_finite()) {
                return Err(SimulationFailure::NonFiniteState(condition.name.clone()));
            }

            let projections = [
                (0, species::M3K_P),
                (1, species::M2K_P),
                (2, species::MAPK_P),
            ];
            for (observable, index) in projections {
                let series: Vec<f64> = y_out.iter().map(|y| y[index]).collect();
                trajectories.set_series(observable, l, &series);
            }
        }

        Ok(trajectories)
    }
}

/// Right-hand side of the cascade under one condition.
///
/// Borrows the parameter vector and the per-call perturbation context;
/// nothing here outlives a single `simulate` invocation.
struct CascadeRhs<'a> {
    parameters: &'a Array1<f64>,
    perturbation: &'a PerturbationVector,
    stimulus: f64,
    decay: f64,
}

impl ODEProblem for CascadeRhs<'_> {
    fn rhs(&self, t: f64, y: &[f64], dy: &mut [f64]) -> Result<(), Error> {
        let x = self.parameters;
        let p = |j: usize| self.perturbation.factor(j);
        let ligand = self.stimulus * (-self.decay * t).exp();

        let v1 = p(1) * x[param::K_ACT3] * ligand * y[species::M3K];
        let v2 = p(2)
            * x[param::V_DEACT3]
            * (1.0 + x[param::K_FB] * y[species::MAPK_P])
            * y[species::M3K_P];
        let v3 = p(3) * x[param::K_ACT2] * y[species::M3K_P] * y[species::M2K];
        let v4 = p(4) * x[param::V_DEACT2] * y[species::M2K_P];
        let v5 = p(5) * x[param::K_ACT1] * y[species::M2K_P] * y[species::MAPK];
        let v6 = p(6) * x[param::V_DEACT1] * y[species::MAPK_P];

        dy[species::M3K] = v2 - v1;
        dy[species::M3K_P] = v1 - v2;
        dy[species::M2K] = v4 - v3;
        dy[species::M2K_P] = v3 - v4;
        dy[species::MAPK] = v6 - v5;
        dy[species::MAPK_P] = v5 - v6;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_simulation() {
        let cascade = PhosphorylationCascade::default();
        let perturbation = PerturbationVector::identity(cascade.num_reactions());

        let trajectories = cascade
            .simulate(
                &PhosphorylationCascade::default_parameters(),
                &PhosphorylationCascade::default_initial_state(),
                &perturbation,
            )
            .expect("baseline simulation failed");

        assert_eq!(trajectories.num_observables(), 3);
        assert_eq!(trajectories.num_conditions(), 2);
        assert_eq!(trajectories.time().len(), 121);
        assert!(trajectories.is_finite());
    }

    #[test]
    fn test_pulse_response_is_transient() {
        let cascade = PhosphorylationCascade::default();
        let perturbation = PerturbationVector::identity(cascade.num_reactions());
        let trajectories = cascade
            .simulate(
                &PhosphorylationCascade::default_parameters(),
                &PhosphorylationCascade::default_initial_state(),
                &perturbation,
            )
            .unwrap();

        // phosphorylated MAPK under the decaying pulse rises above its
        // final value: the response peaks and declines
        let mapk = trajectories.series(2, 0);
        let peak = mapk.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(peak > 0.01, "no activation, peak = {peak}");
        assert!(
            peak > 2.0 * mapk[mapk.len() - 1],
            "pulse response did not decline"
        );
    }

    #[test]
    fn test_perturbation_shifts_the_response() {
        let cascade = PhosphorylationCascade::default();
        let parameters = PhosphorylationCascade::default_parameters();
        let initial_state = PhosphorylationCascade::default_initial_state();

        let baseline = cascade
            .simulate(
                &parameters,
                &initial_state,
                &PerturbationVector::identity(cascade.num_reactions()),
            )
            .unwrap();
        let perturbed = cascade
            .simulate(
                &parameters,
                &initial_state,
                &PerturbationVector::single(cascade.num_reactions(), 1, 1.01),
            )
            .unwrap();

        // boosting M3K activation raises the MAPK amplitude
        let peak = |t: &ConditionTrajectories| {
            t.series(2, 1)
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
        };
        assert!(peak(&perturbed) > peak(&baseline));
    }
}
