//! Search-window seeding and candidate grid generation.
//!
//! We fit the damped sinusoid with a deterministic grid search over
//! `(alpha, omega)` pairs.
//!
//! Why grid search?
//! - It avoids the local minima that trip up general nonlinear optimizers on
//!   oscillatory residual surfaces (every harmonic of omega is a local basin).
//! - It is deterministic given the same inputs/flags.
//! - The linear sub-problem per candidate is tiny (3 columns), so a modest
//!   grid is fast enough for lab captures of a few thousand samples.

use crate::error::AppError;

/// Bounds of the `(alpha, omega)` search.
#[derive(Debug, Clone, Copy)]
pub struct SearchWindow {
    pub alpha_min: f64,
    pub alpha_max: f64,
    pub omega_min: f64,
    pub omega_max: f64,
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(AppError::input(format!(
            "Invalid grid range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::input("Grid steps must be >= 2."));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    Ok(out)
}

/// Generate `steps` linearly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(AppError::input(format!(
            "Invalid grid range: min={min}, max={max} (must be finite and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::input("Grid steps must be >= 2."));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| min + step * i as f64).collect())
}

/// Estimate the angular frequency from zero crossings of the centered series.
///
/// Each crossing of the mean marks half a period, so with `c` crossings over
/// the record span `T` the frequency is roughly `pi * c / T`.
pub fn estimate_omega(time: &[f64], angle: &[f64]) -> Option<f64> {
    if time.len() < 3 || time.len() != angle.len() {
        return None;
    }

    let mean = angle.iter().sum::<f64>() / angle.len() as f64;
    let mut crossings = 0usize;
    let mut prev_sign = 0i8;

    for &a in angle {
        let centered = a - mean;
        let sign = if centered > 0.0 {
            1
        } else if centered < 0.0 {
            -1
        } else {
            0
        };
        if sign != 0 {
            if prev_sign != 0 && sign != prev_sign {
                crossings += 1;
            }
            prev_sign = sign;
        }
    }

    let span = time[time.len() - 1] - time[0];
    if crossings < 2 || !(span.is_finite() && span > 0.0) {
        return None;
    }

    Some(std::f64::consts::PI * crossings as f64 / span)
}

/// Estimate the damping constant from the envelope decay.
///
/// Compares peak deviation from the mean in the first and last quarter of the
/// record: `alpha ~ ln(a_head / a_tail) / dt` between the quarter centers.
pub fn estimate_alpha(time: &[f64], angle: &[f64]) -> Option<f64> {
    let n = time.len();
    if n < 8 || n != angle.len() {
        return None;
    }

    let mean = angle.iter().sum::<f64>() / n as f64;
    let q = n / 4;

    let peak = |range: std::ops::Range<usize>| -> f64 {
        angle[range]
            .iter()
            .map(|a| (a - mean).abs())
            .fold(0.0, f64::max)
    };

    let a_head = peak(0..q);
    let a_tail = peak(n - q..n);

    let t_head = (time[0] + time[q - 1]) / 2.0;
    let t_tail = (time[n - q] + time[n - 1]) / 2.0;
    let dt = t_tail - t_head;

    if !(a_head > 0.0 && a_tail > 0.0 && dt > 0.0) {
        return None;
    }

    let alpha = (a_head / a_tail).ln() / dt;
    if alpha.is_finite() && alpha > 0.0 {
        Some(alpha)
    } else {
        None
    }
}

/// Build the initial search window from data seeds and flag overrides.
pub fn seed_window(
    time: &[f64],
    angle: &[f64],
    alpha_min: Option<f64>,
    alpha_max: Option<f64>,
    omega_span: f64,
) -> Result<SearchWindow, AppError> {
    if !(omega_span.is_finite() && omega_span > 0.0 && omega_span < 1.0) {
        return Err(AppError::input(format!(
            "Invalid omega span {omega_span} (must be in (0, 1))."
        )));
    }

    let span = time.last().copied().unwrap_or(0.0) - time.first().copied().unwrap_or(0.0);
    if !(span.is_finite() && span > 0.0) {
        return Err(AppError::no_data("Record has no usable time span."));
    }

    // Frequency: zero-crossing seed, fall back to one cycle over the record.
    let omega0 = estimate_omega(time, angle).unwrap_or(std::f64::consts::TAU / span);
    let omega_min = omega0 * (1.0 - omega_span);
    let omega_max = omega0 * (1.0 + omega_span);

    // Damping: envelope seed bracketed a decade either way, or a broad
    // default covering "barely damped" to "decays within the record".
    let (a_lo, a_hi) = match estimate_alpha(time, angle) {
        Some(alpha0) => (alpha0 / 10.0, alpha0 * 10.0),
        None => (0.01 / span, 10.0 / span),
    };
    let alpha_lo = alpha_min.unwrap_or(a_lo).max(1e-9);
    let alpha_hi = alpha_max.unwrap_or(a_hi);

    if alpha_hi <= alpha_lo {
        return Err(AppError::input(format!(
            "Invalid damping range: [{alpha_lo}, {alpha_hi}]."
        )));
    }

    Ok(SearchWindow {
        alpha_min: alpha_lo,
        alpha_max: alpha_hi,
        omega_min,
        omega_max,
    })
}

/// Cross product of log-spaced alpha and linearly spaced omega candidates.
pub fn build_candidates(
    window: &SearchWindow,
    alpha_steps: usize,
    omega_steps: usize,
) -> Result<Vec<(f64, f64)>, AppError> {
    let alphas = log_space(window.alpha_min, window.alpha_max, alpha_steps)?;
    let omegas = lin_space(window.omega_min, window.omega_max, omega_steps)?;

    let mut out = Vec::with_capacity(alphas.len() * omegas.len());
    for &alpha in &alphas {
        for &omega in &omegas {
            out.push((alpha, omega));
        }
    }
    Ok(out)
}
