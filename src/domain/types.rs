//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw recorded trajectory: parallel `(time, x, y)` series.
///
/// Invariants (enforced by ingest):
/// - all three vectors have equal length
/// - all values are finite
/// - `time` is strictly increasing
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    /// Sample times in seconds.
    pub time: Vec<f64>,
    /// x-position in metres.
    pub x: Vec<f64>,
    /// y-position in metres.
    pub y: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Polar form of a trajectory, sharing the same time base.
#[derive(Debug, Clone)]
pub struct PolarTrack {
    /// Sample times in seconds.
    pub time: Vec<f64>,
    /// Radial distance from the rotation axis, metres.
    pub radius: Vec<f64>,
    /// Angular position in radians (`atan2(x, y)`, measured from +y).
    pub angle: Vec<f64>,
}

/// Fitted damped-oscillation model:
///
/// `theta(t) = amplitude * exp(-damping * t) * sin(frequency * t + phase) + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DampedModel {
    /// Peak angular amplitude `A` (radians), always non-negative.
    pub amplitude: f64,
    /// Exponential damping constant `alpha` (1/s).
    pub damping: f64,
    /// Angular frequency `omega` (rad/s).
    pub frequency: f64,
    /// Phase `phi` (radians), in `(-pi, pi]`.
    pub phase: f64,
    /// Equilibrium angle `theta0` (radians).
    pub offset: f64,
}

impl DampedModel {
    /// Evaluate the model at time `t`.
    pub fn eval(&self, t: f64) -> f64 {
        self.amplitude * (-self.damping * t).exp() * (self.frequency * t + self.phase).sin()
            + self.offset
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// Fit output for one angular time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub model: DampedModel,
    pub quality: FitQuality,
}

/// A per-sample fitted result (used for residual plots and exports).
#[derive(Debug, Clone)]
pub struct ResidualPoint {
    pub time: f64,
    pub theta_obs: f64,
    pub theta_fit: f64,
    pub residual: f64,
}

/// Summary stats about the rows actually kept from a file.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_points: usize,
    pub time_min: f64,
    pub time_max: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// Input capture files, processed in order through one shared cache.
    pub inputs: Vec<PathBuf>,

    /// Damping grid bounds (1/s). When unset, the range is seeded from the
    /// observed envelope decay.
    pub alpha_min: Option<f64>,
    pub alpha_max: Option<f64>,
    pub alpha_steps: usize,

    /// Frequency search span as a fraction around the zero-crossing seed
    /// (e.g. `0.5` searches `[0.5*omega0, 1.5*omega0]`).
    pub omega_span: f64,
    pub omega_steps: usize,

    /// Number of grid-zoom refinement passes after the coarse search.
    pub refine_passes: usize,

    /// Remove 2*pi jumps from the angle series before fitting.
    pub unwrap_angles: bool,

    /// Override the apparatus moment of inertia (kg m^2).
    pub inertia_override: Option<f64>,

    /// Number of largest-residual samples to list.
    pub top_n: usize,

    /// Terminal quick-look plot.
    pub ascii_plot: bool,
    pub ascii_width: usize,
    pub ascii_height: usize,

    /// SVG chart output directory (`None` disables chart files).
    pub charts_dir: Option<PathBuf>,
    pub chart_width: u32,
    pub chart_height: u32,

    /// Per-sample results CSV export (single-input runs only).
    pub export_results: Option<PathBuf>,
    /// Fit JSON export (single-input runs only).
    pub export_fit: Option<PathBuf>,
}

/// A saved fit file (JSON).
///
/// This is the "portable" representation of a fitted oscillation:
/// - model parameters + quality
/// - the content digest of the source capture
/// - a precomputed model grid for quick re-plotting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    /// SHA-256 hex digest of the source capture file.
    pub source_digest: String,
    pub model: DampedModel,
    pub quality: FitQuality,
    pub grid: ModelGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelGrid {
    pub time_s: Vec<f64>,
    pub theta_rad: Vec<f64>,
}
