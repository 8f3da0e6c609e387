//! Reporting utilities: residuals, outliers, and formatted terminal output.

use crate::domain::{DampedModel, PolarTrack, ResidualPoint};
use crate::error::AppError;

pub mod format;

pub use format::*;

/// Compute fitted values and residuals over the angular time series.
pub fn compute_residuals(
    track: &PolarTrack,
    model: &DampedModel,
) -> Result<Vec<ResidualPoint>, AppError> {
    let mut out = Vec::with_capacity(track.time.len());
    for (&t, &theta_obs) in track.time.iter().zip(track.angle.iter()) {
        let theta_fit = model.eval(t);
        if !theta_fit.is_finite() {
            return Err(AppError::numeric(
                "Non-finite model prediction during residual computation.",
            ));
        }
        out.push(ResidualPoint {
            time: t,
            theta_obs,
            theta_fit,
            residual: theta_obs - theta_fit,
        });
    }
    Ok(out)
}

/// Rank the top-N samples by absolute residual (worst first).
pub fn rank_outliers(residuals: &[ResidualPoint], top_n: usize) -> Vec<ResidualPoint> {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| {
        b.residual
            .abs()
            .partial_cmp(&a.residual.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_are_observation_minus_model() {
        let model = DampedModel {
            amplitude: 0.0,
            damping: 0.0,
            frequency: 1.0,
            phase: 0.0,
            offset: 0.5,
        };
        let track = PolarTrack {
            time: vec![0.0, 1.0],
            radius: vec![1.0, 1.0],
            angle: vec![0.7, 0.4],
        };

        let res = compute_residuals(&track, &model).unwrap();
        assert!((res[0].residual - 0.2).abs() < 1e-12);
        assert!((res[1].residual + 0.1).abs() < 1e-12);
    }

    #[test]
    fn non_finite_prediction_is_a_numeric_error() {
        let model = DampedModel {
            amplitude: 1.0,
            damping: 0.0,
            frequency: 1.0,
            phase: 0.0,
            offset: f64::NAN,
        };
        let track = PolarTrack {
            time: vec![0.0, 1.0],
            radius: vec![1.0, 1.0],
            angle: vec![0.1, 0.2],
        };

        let err = compute_residuals(&track, &model).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn outliers_sorted_by_absolute_residual() {
        let mk = |t: f64, r: f64| ResidualPoint {
            time: t,
            theta_obs: r,
            theta_fit: 0.0,
            residual: r,
        };
        let residuals = vec![mk(0.0, 0.1), mk(1.0, -0.5), mk(2.0, 0.3)];

        let top = rank_outliers(&residuals, 2);
        assert_eq!(top.len(), 2);
        assert!((top[0].residual + 0.5).abs() < 1e-12);
        assert!((top[1].residual - 0.3).abs() < 1e-12);
    }
}
