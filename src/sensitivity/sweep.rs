//! The parameter-set × reaction sweep driver.
//!
//! The sweep walks every fitted parameter set and every reaction slot,
//! re-simulates the network under a 1% rate perturbation, reduces each
//! trajectory to the chosen signaling metric and hands the collected
//! tensor to the aggregator. A single failed simulation never aborts the
//! sweep; the affected cells simply stay NaN.

use derive_builder::Builder;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::model::network::ReactionNetwork;
use crate::store::paramset::ParamsetStore;

use super::aggregate::aggregate;
use super::error::SensitivityError;
use super::metric::SignalingMetric;
use super::perturbation::run_perturbed;
use super::tensor::{SensitivityCoefficientTensor, SignalingMetricTensor};

/// Configuration of a sensitivity sweep.
///
/// # Fields
///
/// * `rate` - multiplicative perturbation applied to one reaction at a time
///   (default: 1.01, a 1% change)
/// * `epsilon` - threshold below which a metric change counts as no change
///   (default: 1e-9)
///
/// # Examples
///
/// ```
/// use signalsens::prelude::SweepSetupBuilder;
///
/// let setup = SweepSetupBuilder::default()
///     .rate(1.05)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct SweepSetup {
    #[builder(default = "1.01")]
    pub rate: f64,
    #[builder(default = "1e-9")]
    pub epsilon: f64,
}

impl Default for SweepSetup {
    fn default() -> Self {
        SweepSetupBuilder::default().build().unwrap()
    }
}

/// Runs the full sensitivity sweep and returns the coefficient tensor.
///
/// For every completed parameter set in `store` and every reaction slot
/// `0..num_reactions`, one simulation is run with that reaction's rate
/// scaled by `setup.rate`. Slot 0 is forced to a rate of exactly 1.0 and
/// therefore holds the unperturbed baseline every other slot is compared
/// against. `num_reactions` is usually `model.num_reactions()`; passing a
/// smaller value sweeps a prefix of the reaction slots.
///
/// Failure policy: a non-convergent or truncated simulation leaves its
/// cells NaN and the sweep continues; a parameter set that no longer loads
/// is logged and leaves its whole row NaN. An empty store yields a tensor
/// with a zero-length first dimension, not an error.
///
/// Progress is reported as processed/total perturbation runs on a console
/// progress bar; the counter has no effect on the data.
pub fn run_sweep<M: ReactionNetwork, S: ParamsetStore>(
    model: &M,
    store: &S,
    metric: SignalingMetric,
    num_reactions: usize,
    setup: &SweepSetup,
) -> Result<SensitivityCoefficientTensor, SensitivityError> {
    let paramsets = store.list_paramsets()?;
    let num_observables = model.observables().len();
    let num_conditions = model.conditions().len();

    log::info!(
        "sweeping {} parameter sets over {} reactions ({} metric)",
        paramsets.len(),
        num_reactions,
        metric
    );

    let mut metrics = SignalingMetricTensor::nan((
        paramsets.len(),
        num_reactions,
        num_observables,
        num_conditions,
    ));

    let progress = ProgressBar::new((paramsets.len() * num_reactions) as u64).with_style(
        ProgressStyle::default_bar()
            .template("{pos} / {len} [{bar:40}] {elapsed}")
            .unwrap(),
    );

    for (i, &id) in paramsets.iter().enumerate() {
        let paramset = match store.load_paramset(id) {
            Ok(paramset) => paramset,
            Err(error) => {
                // listed as complete but unreadable now: leave the row NaN
                log::warn!("parameter set {id} could not be loaded: {error}");
                progress.inc(num_reactions as u64);
                continue;
            }
        };

        for j in 0..num_reactions {
            // slot 0 is the unperturbed reference run
            let rate = if j == 0 { 1.0 } else { setup.rate };

            match run_perturbed(model, j, rate, &paramset.parameters, &paramset.initial_state) {
                Ok(trajectories) => {
                    for (k, l) in iproduct!(0..num_observables, 0..num_conditions) {
                        metrics.set(i, j, k, l, metric.compute(trajectories.series(k, l)));
                    }
                }
                Err(failure) => {
                    log::debug!("parameter set {id}, reaction {j}: {failure}");
                }
            }

            progress.inc(1);
        }
    }

    progress.finish();

    Ok(aggregate(&metrics, setup.rate, setup.epsilon))
}
