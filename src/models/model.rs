//! Evaluation primitives for the damped-oscillation model.
//!
//! The fitter relies on three operations:
//! - build a design row for a given time and `(alpha, omega)` (for OLS)
//! - predict `theta(t)` from the linear coefficients (for SSE during search)
//! - convert the separable parameterization back to amplitude/phase form
//!
//! The separable form used during fitting is:
//!
//! ```text
//! theta(t) = B * e^{-alpha t} sin(omega t) + C * e^{-alpha t} cos(omega t) + theta0
//! ```
//!
//! which equals `A e^{-alpha t} sin(omega t + phi) + theta0` with
//! `A = sqrt(B^2 + C^2)` and `phi = atan2(C, B)`.

use crate::domain::DampedModel;

/// Number of linear coefficients in the separable form (`B`, `C`, `theta0`).
pub const LINEAR_PARAMS: usize = 3;

/// Fill a design row for the separable model.
///
/// # Panics
/// Panics if `out` has length below [`LINEAR_PARAMS`]. Callers size the row
/// once and reuse it.
pub fn fill_design_row(t: f64, alpha: f64, omega: f64, out: &mut [f64]) {
    let envelope = (-alpha * t).exp();
    out[0] = envelope * (omega * t).sin();
    out[1] = envelope * (omega * t).cos();
    out[2] = 1.0;
}

/// Predict `theta(t)` from the linear coefficients `[B, C, theta0]`.
pub fn predict_linear(t: f64, alpha: f64, omega: f64, coeffs: &[f64]) -> f64 {
    let envelope = (-alpha * t).exp();
    envelope * (coeffs[0] * (omega * t).sin() + coeffs[1] * (omega * t).cos()) + coeffs[2]
}

/// Convert the separable parameterization to amplitude/phase form.
pub fn model_from_linear(alpha: f64, omega: f64, coeffs: &[f64]) -> DampedModel {
    let b = coeffs[0];
    let c = coeffs[1];
    DampedModel {
        amplitude: b.hypot(c),
        damping: alpha,
        frequency: omega,
        phase: c.atan2(b),
        offset: coeffs[2],
    }
}
