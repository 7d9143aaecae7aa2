//! Command-line interface for the signalsens library
//!
//! This binary runs the reaction sensitivity analysis against the bundled
//! reference cascade, reading fitted parameter sets from an optimization
//! results directory and caching the coefficient tensor per metric.
//!
//! # Usage
//!
//! ```bash
//! # Amplitude sensitivity over the fitted parameter sets in ./out
//! signalsens analyze --metric amplitude --results-dir ./out
//!
//! # Recompute the integral metric with a 5% perturbation and write plots
//! signalsens analyze --metric integral --rate 1.05 --plot-dir ./figure
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use signalsens::plotting::{sensitivity_barplot, sensitivity_heatmap};
use signalsens::prelude::{
    run_analysis, DirectoryStore, Paramset, PhosphorylationCascade, ReactionNetwork,
    SearchIndices, SensitivityCoefficientTensor, SweepSetupBuilder,
};

/// Main CLI configuration struct
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Compute reaction sensitivity coefficients for the reference cascade
    Analyze {
        /// Signaling metric: amplitude, duration or integral
        #[arg(short, long)]
        metric: String,

        /// Directory holding the numbered optimization run folders
        #[arg(long, default_value = "./out")]
        results_dir: PathBuf,

        /// Directory the coefficient artifacts are cached under
        #[arg(long, default_value = "./sensitivities")]
        output_dir: PathBuf,

        /// Multiplicative perturbation applied to one reaction at a time
        #[arg(long, default_value_t = 1.01)]
        rate: f64,

        /// Write per-observable bar plots and heatmaps to this directory
        #[arg(long)]
        plot_dir: Option<PathBuf>,
    },
}

/// Main entry point for the CLI application
pub fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze {
            metric,
            results_dir,
            output_dir,
            rate,
            plot_dir,
        } => {
            let cascade = PhosphorylationCascade::default();
            let store = DirectoryStore::new(
                results_dir,
                Paramset {
                    parameters: PhosphorylationCascade::default_parameters(),
                    initial_state: PhosphorylationCascade::default_initial_state(),
                },
                SearchIndices::all_parameters(PhosphorylationCascade::default_parameters().len()),
            );
            let setup = SweepSetupBuilder::default()
                .rate(*rate)
                .build()
                .expect("valid sweep setup");

            let tensor = match run_analysis(&cascade, &store, metric, output_dir, &setup) {
                Ok(tensor) => tensor,
                Err(error) => {
                    eprintln!("analysis failed: {error}");
                    std::process::exit(1);
                }
            };

            let [n_sets, n_reactions, n_observables, n_conditions] = tensor.shape();
            println!(
                "sensitivity coefficients for '{metric}': {n_sets} parameter sets × \
                 {n_reactions} reactions × {n_observables} observables × {n_conditions} conditions"
            );

            if let Some(plot_dir) = plot_dir {
                if let Err(error) = write_plots(&cascade, &tensor, metric, plot_dir) {
                    eprintln!("failed to write plots: {error}");
                    std::process::exit(1);
                }
                println!("plots written to {}", plot_dir.display());
            }
        }
    }
}

/// Writes one bar plot per observable and one heatmap per
/// (observable, condition) pair.
fn write_plots(
    cascade: &PhosphorylationCascade,
    tensor: &SensitivityCoefficientTensor,
    metric: &str,
    plot_dir: &PathBuf,
) -> std::io::Result<()> {
    let dir = plot_dir.join(metric);
    std::fs::create_dir_all(&dir)?;

    for (k, observable) in cascade.observables().iter().enumerate() {
        let barplot = sensitivity_barplot(tensor, k, observable, cascade.conditions());
        barplot.write_html(dir.join(format!("{observable}_barplot.html")));

        for (l, condition) in cascade.conditions().iter().enumerate() {
            let heatmap = sensitivity_heatmap(tensor, k, observable, l, condition);
            heatmap.write_html(dir.join(format!("{observable}_{condition}_heatmap.html")));
        }
    }

    Ok(())
}
