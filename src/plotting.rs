//! Plotting of sensitivity coefficient tensors.
//!
//! Two views are provided:
//!
//! - a bar plot per observable: the coefficient of every reaction, averaged
//!   across parameter sets, one bar group per condition with the standard
//!   deviation as error bars
//! - a heatmap per (observable, condition): parameter sets × reactions,
//!   exposing how consistent the ranking is across the fitted population
//!
//! Parameter sets with any failed cell for the plotted observable are
//! excluded from the averages, mirroring how the coefficients are reported
//! in the reference analysis.

use ndarray::Array2;
use plotly::{
    common::{ErrorData, ErrorType, Title},
    layout::Axis as PlotAxis,
    Bar, HeatMap, Layout, Plot,
};

use crate::sensitivity::tensor::SensitivityCoefficientTensor;

/// Mean and sample standard deviation of the coefficients for one
/// observable, `[reaction, condition]`, across parameter sets.
///
/// Parameter sets with any NaN entry for this observable are dropped;
/// returns `None` when no parameter set survives.
pub fn condition_statistics(
    tensor: &SensitivityCoefficientTensor,
    observable: usize,
) -> Option<(Array2<f64>, Array2<f64>)> {
    let [n_sets, n_reactions, _, n_conditions] = tensor.shape();

    let complete: Vec<usize> = (0..n_sets)
        .filter(|&i| {
            (0..n_reactions).all(|j| {
                (0..n_conditions).all(|l| !tensor.get(i, j, observable, l).is_nan())
            })
        })
        .collect();
    if complete.is_empty() {
        return None;
    }

    let mut mean = Array2::zeros((n_reactions, n_conditions));
    let mut std = Array2::zeros((n_reactions, n_conditions));

    let n = complete.len() as f64;
    for j in 0..n_reactions {
        for l in 0..n_conditions {
            let values = complete
                .iter()
                .map(|&i| tensor.get(i, j, observable, l))
                .collect::<Vec<_>>();
            let m = values.iter().sum::<f64>() / n;
            mean[[j, l]] = m;
            std[[j, l]] = if complete.len() > 1 {
                (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
            } else {
                0.0
            };
        }
    }

    Some((mean, std))
}

/// Bar plot of one observable's coefficients, averaged across parameter
/// sets, grouped by condition.
pub fn sensitivity_barplot(
    tensor: &SensitivityCoefficientTensor,
    observable: usize,
    observable_name: &str,
    condition_names: &[String],
) -> Plot {
    let [_, n_reactions, _, _] = tensor.shape();
    let reaction_labels: Vec<String> = (0..n_reactions).map(|j| j.to_string()).collect();

    let mut plot = Plot::new();

    if let Some((mean, std)) = condition_statistics(tensor, observable) {
        for (l, condition) in condition_names.iter().enumerate() {
            let trace = Bar::new(
                reaction_labels.clone(),
                mean.column(l).to_vec(),
            )
            .name(condition)
            .error_y(ErrorData::new(ErrorType::Data).array(std.column(l).to_vec()));
            plot.add_trace(trace);
        }
    }

    plot.set_layout(
        Layout::new()
            .title(Title::from(observable_name.to_string()))
            .x_axis(PlotAxis::new().title(Title::from("Reaction".to_string())))
            .y_axis(PlotAxis::new().title(Title::from("Sensitivity coefficient".to_string()))),
    );

    plot
}

/// Heatmap of one (observable, condition) slice: parameter sets over
/// reactions. Failed cells are left empty.
pub fn sensitivity_heatmap(
    tensor: &SensitivityCoefficientTensor,
    observable: usize,
    observable_name: &str,
    condition: usize,
    condition_name: &str,
) -> Plot {
    let [n_sets, n_reactions, _, _] = tensor.shape();

    let z: Vec<Vec<f64>> = (0..n_sets)
        .map(|i| {
            (0..n_reactions)
                .map(|j| tensor.get(i, j, observable, condition))
                .collect()
        })
        .collect();

    let mut plot = Plot::new();
    plot.add_trace(HeatMap::new_z(z));
    plot.set_layout(
        Layout::new()
            .title(Title::from(format!("{observable_name} ({condition_name})")))
            .x_axis(PlotAxis::new().title(Title::from("Reaction".to_string())))
            .y_axis(PlotAxis::new().title(Title::from("Parameter set".to_string()))),
    );

    plot
}
