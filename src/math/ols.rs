//! Least squares solver.
//!
//! For fixed `(alpha, omega)` the damped-oscillation model is linear in the
//! remaining parameters:
//!
//! ```text
//! theta(t) = B * exp(-alpha t) sin(omega t) + C * exp(-alpha t) cos(omega t) + theta0
//! ```
//!
//! so the grid search repeatedly solves a small 3-column regression.
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Heavily damped candidates can produce nearly collinear columns (the two
//!   oscillatory columns both decay to ~0), so we try progressively looser
//!   tolerances before giving up.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
