//! Command-line parsing for the torsion-oscillation analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "torfit",
    version,
    about = "Torsion pendulum capture analyzer (damped-sinusoid fit)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full analysis: fit, derived quantities, residuals, plots, exports.
    Analyze(AnalyzeArgs),
    /// Print fitted parameters only, one line per file (useful for scripting).
    Fit(AnalyzeArgs),
    /// Plot a previously exported fit JSON.
    Plot(PlotArgs),
}

/// Common options for analysis and fitting.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Capture CSV file(s): `time,x,y` rows after two header lines.
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Minimum damping constant (1/s) for the grid search.
    /// Defaults to a bracket around the envelope-decay seed.
    #[arg(long)]
    pub alpha_min: Option<f64>,

    /// Maximum damping constant (1/s) for the grid search.
    #[arg(long)]
    pub alpha_max: Option<f64>,

    /// Damping grid steps per pass.
    #[arg(long, default_value_t = 25)]
    pub alpha_steps: usize,

    /// Frequency search span as a fraction around the zero-crossing seed.
    #[arg(long, default_value_t = 0.5)]
    pub omega_span: f64,

    /// Frequency grid steps per pass.
    #[arg(long, default_value_t = 61)]
    pub omega_steps: usize,

    /// Grid-zoom refinement passes after the coarse search.
    #[arg(long = "refine", default_value_t = 3)]
    pub refine_passes: usize,

    /// Remove 2*pi jumps from the angle series before fitting.
    #[arg(long)]
    pub unwrap: bool,

    /// Override the apparatus moment of inertia (kg m^2).
    #[arg(long, value_name = "KG_M2")]
    pub inertia: Option<f64>,

    /// Show the top-N largest residuals.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Disable the terminal plot (enabled by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// SVG chart output directory.
    #[arg(long, value_name = "DIR", default_value = "charts")]
    pub charts: PathBuf,

    /// Disable SVG chart output.
    #[arg(long)]
    pub no_charts: bool,

    /// SVG chart width (pixels).
    #[arg(long, default_value_t = 1024)]
    pub chart_width: u32,

    /// SVG chart height (pixels).
    #[arg(long, default_value_t = 640)]
    pub chart_height: u32,

    /// Export per-sample residuals to CSV (single input only).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the fit (model + quality + grid) to JSON (single input only).
    #[arg(long = "export-fit", value_name = "JSON")]
    pub export_fit: Option<PathBuf>,
}

/// Options for plotting a saved fit.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Fit JSON file produced by `torfit analyze --export-fit`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also render the model curve as an SVG chart into this directory.
    #[arg(long, value_name = "DIR")]
    pub charts: Option<PathBuf>,

    /// SVG chart width (pixels).
    #[arg(long, default_value_t = 1024)]
    pub chart_width: u32,

    /// SVG chart height (pixels).
    #[arg(long, default_value_t = 640)]
    pub chart_height: u32,
}
