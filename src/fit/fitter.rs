//! Low-level fitting routine for the damped-oscillation model.
//!
//! Given:
//! - sample times `t_i`
//! - observed angles `theta_i`
//! - a search window for `(alpha, omega)`
//!
//! we solve, for each candidate `(alpha, omega)` pair:
//! - an OLS problem for the linear coefficients `(B, C, theta0)`
//! - the resulting SSE
//!
//! keep the best (lowest SSE) candidate, and zoom the grid around it for a
//! fixed number of refinement passes.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{FitQuality, FitResult};
use crate::error::AppError;
use crate::fit::grid::{SearchWindow, build_candidates};
use crate::math::solve_least_squares;
use crate::models::{LINEAR_PARAMS, fill_design_row, model_from_linear, predict_linear};

/// Minimum number of samples we are willing to fit 5 parameters to.
const MIN_POINTS: usize = 10;

/// Fitting options that affect how the search runs.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    /// Log-spaced alpha candidates per pass.
    pub alpha_steps: usize,
    /// Linearly spaced omega candidates per pass.
    pub omega_steps: usize,
    /// Number of grid-zoom passes after the coarse search.
    pub refine_passes: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            alpha_steps: 25,
            omega_steps: 61,
            refine_passes: 3,
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    alpha: f64,
    omega: f64,
    coeffs: Vec<f64>,
    sse: f64,
}

/// Fit the damped-oscillation model to an angular time series.
pub fn fit_damped(
    time: &[f64],
    angle: &[f64],
    window: &SearchWindow,
    opts: &FitOptions,
) -> Result<FitResult, AppError> {
    let n = time.len();
    if n != angle.len() {
        return Err(AppError::numeric(format!(
            "Time/angle length mismatch: {n} vs {}.",
            angle.len()
        )));
    }
    if n < MIN_POINTS {
        return Err(AppError::no_data(format!(
            "Too few samples to fit: n={n} (need >= {MIN_POINTS})."
        )));
    }
    if time.iter().chain(angle.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::numeric("Non-finite sample in fit input."));
    }

    let mean = angle.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = angle.iter().map(|a| (a - mean) * (a - mean)).sum();
    if ss_tot <= 1e-30 {
        return Err(AppError::no_data(
            "Angle series has zero variance (no oscillation to fit).",
        ));
    }

    // Coarse pass over the seeded window, then deterministic zooms.
    let mut window = *window;
    let mut best = search_window(time, angle, &window, opts)?;

    for _ in 0..opts.refine_passes {
        window = zoom_window(&window, &best, opts);
        let refined = search_window(time, angle, &window, opts)?;
        if refined.sse < best.sse {
            best = refined;
        }
    }

    let model = model_from_linear(best.alpha, best.omega, &best.coeffs);
    let rmse = (best.sse / n as f64).sqrt();
    let r_squared = 1.0 - best.sse / ss_tot;

    Ok(FitResult {
        model,
        quality: FitQuality {
            sse: best.sse,
            rmse,
            r_squared,
            n,
        },
    })
}

fn search_window(
    time: &[f64],
    angle: &[f64],
    window: &SearchWindow,
    opts: &FitOptions,
) -> Result<Candidate, AppError> {
    let grid = build_candidates(window, opts.alpha_steps, opts.omega_steps)?;

    // Evaluate each candidate pair independently (parallel).
    let candidates: Vec<Candidate> = grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &(alpha, omega))| {
            evaluate_candidate(time, angle, alpha, omega).map(|(coeffs, sse)| Candidate {
                idx,
                alpha,
                omega,
                coeffs,
                sse,
            })
        })
        .collect();

    if candidates.is_empty() {
        return Err(AppError::numeric(
            "No valid fit candidates (all grid solves failed).",
        ));
    }

    // Deterministic selection: minimum SSE, ties broken by grid index.
    let mut best = &candidates[0];
    for c in &candidates[1..] {
        if c.sse < best.sse || (c.sse == best.sse && c.idx < best.idx) {
            best = c;
        }
    }

    Ok(best.clone())
}

fn evaluate_candidate(
    time: &[f64],
    angle: &[f64],
    alpha: f64,
    omega: f64,
) -> Option<(Vec<f64>, f64)> {
    let n = time.len();

    let mut x = DMatrix::<f64>::zeros(n, LINEAR_PARAMS);
    let mut y = DVector::<f64>::zeros(n);
    let mut row = [0.0; LINEAR_PARAMS];

    for i in 0..n {
        fill_design_row(time[i], alpha, omega, &mut row);
        for j in 0..LINEAR_PARAMS {
            x[(i, j)] = row[j];
        }
        y[i] = angle[i];
    }

    let beta = solve_least_squares(&x, &y)?;
    let coeffs: Vec<f64> = beta.iter().copied().collect();

    let mut sse = 0.0;
    for i in 0..n {
        let r = angle[i] - predict_linear(time[i], alpha, omega, &coeffs);
        sse += r * r;
    }

    if sse.is_finite() { Some((coeffs, sse)) } else { None }
}

/// Shrink the window to one grid cell around the incumbent, clamped to the
/// previous window.
///
/// Each pass re-grids the shrunk window with the same step counts, so cell
/// size drops by roughly the step count per pass and successive passes
/// converge quickly.
fn zoom_window(window: &SearchWindow, best: &Candidate, opts: &FitOptions) -> SearchWindow {
    let alpha_cell = (window.alpha_max / window.alpha_min)
        .powf(1.0 / (opts.alpha_steps.max(2) as f64 - 1.0))
        .max(1.0 + 1e-9);
    let omega_cell =
        (window.omega_max - window.omega_min) / (opts.omega_steps.max(2) as f64 - 1.0);

    SearchWindow {
        alpha_min: (best.alpha / alpha_cell).max(window.alpha_min),
        alpha_max: (best.alpha * alpha_cell).min(window.alpha_max),
        omega_min: (best.omega - omega_cell).max(window.omega_min),
        omega_max: (best.omega + omega_cell).min(window.omega_max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DampedModel;
    use crate::fit::grid::seed_window;

    fn synthetic(model: &DampedModel, n: usize, dt: f64) -> (Vec<f64>, Vec<f64>) {
        let time: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();
        let angle: Vec<f64> = time.iter().map(|&t| model.eval(t)).collect();
        (time, angle)
    }

    #[test]
    fn fit_recovers_known_parameters_on_clean_data() {
        let truth = DampedModel {
            amplitude: 1.2,
            damping: 0.15,
            frequency: 3.8,
            phase: 0.6,
            offset: 0.1,
        };
        let (time, angle) = synthetic(&truth, 1500, 0.02);

        let window = seed_window(&time, &angle, None, None, 0.5).unwrap();
        let fit = fit_damped(&time, &angle, &window, &FitOptions::default()).unwrap();

        assert!(
            (fit.model.frequency - truth.frequency).abs() < 0.05,
            "omega {} vs {}",
            fit.model.frequency,
            truth.frequency
        );
        assert!(
            (fit.model.damping - truth.damping).abs() < 0.05,
            "alpha {} vs {}",
            fit.model.damping,
            truth.damping
        );
        assert!((fit.model.amplitude - truth.amplitude).abs() < 0.1);
        assert!((fit.model.offset - truth.offset).abs() < 0.05);
        assert!(fit.quality.r_squared > 0.99);
    }

    #[test]
    fn fit_is_robust_to_small_noise() {
        let truth = DampedModel {
            amplitude: 0.8,
            damping: 0.08,
            frequency: 5.0,
            phase: -0.4,
            offset: -0.02,
        };
        let (time, mut angle) = synthetic(&truth, 2000, 0.015);

        // Deterministic pseudo-noise, small relative to the signal.
        for (i, a) in angle.iter_mut().enumerate() {
            *a += 0.005 * ((i as f64 * 12.9898).sin() * 43758.5453).fract();
        }

        let window = seed_window(&time, &angle, None, None, 0.5).unwrap();
        let fit = fit_damped(&time, &angle, &window, &FitOptions::default()).unwrap();

        assert!((fit.model.frequency - truth.frequency).abs() / truth.frequency < 0.02);
        assert!(fit.quality.r_squared > 0.95);
        assert!(fit.quality.rmse.is_finite());
    }

    #[test]
    fn fit_rejects_tiny_records() {
        let time = vec![0.0, 0.1, 0.2];
        let angle = vec![0.1, 0.0, -0.1];
        let window = SearchWindow {
            alpha_min: 0.01,
            alpha_max: 1.0,
            omega_min: 1.0,
            omega_max: 10.0,
        };
        let err = fit_damped(&time, &angle, &window, &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn mismatched_series_lengths_are_a_numeric_error() {
        let time: Vec<f64> = (0..50).map(|i| i as f64 * 0.1).collect();
        let angle: Vec<f64> = (0..49).map(|i| (i as f64 * 0.3).sin()).collect();
        let window = SearchWindow {
            alpha_min: 0.01,
            alpha_max: 1.0,
            omega_min: 1.0,
            omega_max: 10.0,
        };
        let err = fit_damped(&time, &angle, &window, &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn non_finite_samples_are_a_numeric_error() {
        let time: Vec<f64> = (0..50).map(|i| i as f64 * 0.1).collect();
        let mut angle: Vec<f64> = time.iter().map(|&t| (3.0 * t).sin()).collect();
        angle[25] = f64::NAN;
        let window = SearchWindow {
            alpha_min: 0.01,
            alpha_max: 1.0,
            omega_min: 1.0,
            omega_max: 10.0,
        };
        let err = fit_damped(&time, &angle, &window, &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn fit_rejects_constant_series() {
        let time: Vec<f64> = (0..50).map(|i| i as f64 * 0.1).collect();
        let angle = vec![0.25; 50];
        let window = SearchWindow {
            alpha_min: 0.01,
            alpha_max: 1.0,
            omega_min: 1.0,
            omega_max: 10.0,
        };
        let err = fit_damped(&time, &angle, &window, &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
