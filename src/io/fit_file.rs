//! Read/write fit JSON files.
//!
//! Fit JSON is the "portable" representation of a fitted oscillation:
//! - model parameters + fit quality
//! - the content digest of the source capture
//! - a precomputed model grid for quick re-plotting
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{FitFile, FitResult, ModelGrid, PolarTrack};
use crate::error::AppError;
use crate::io::hash::FileDigest;

/// Samples in the precomputed model grid.
const GRID_POINTS: usize = 201;

/// Write a fit JSON file.
pub fn write_fit_json(
    path: &Path,
    fit: &FitResult,
    digest: &FileDigest,
    track: &PolarTrack,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create fit JSON '{}': {e}",
            path.display()
        ))
    })?;

    let t0 = track.time.first().copied().unwrap_or(0.0);
    let t1 = track.time.last().copied().unwrap_or(1.0);
    let grid = build_grid(fit, t0, t1, GRID_POINTS);

    let fit_file = FitFile {
        tool: "torfit".to_string(),
        generated: Utc::now(),
        source_digest: digest.as_hex().to_string(),
        model: fit.model,
        quality: fit.quality.clone(),
        grid,
    };

    serde_json::to_writer_pretty(file, &fit_file)
        .map_err(|e| AppError::input(format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let fit_file: FitFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid fit JSON: {e}")))?;
    Ok(fit_file)
}

fn build_grid(fit: &FitResult, t_min: f64, t_max: f64, n: usize) -> ModelGrid {
    let n = n.max(2);
    let mut t0 = t_min;
    let mut t1 = t_max;
    if !(t0.is_finite() && t1.is_finite()) || t1 <= t0 {
        t0 = 0.0;
        t1 = 1.0;
    }

    let mut time_s = Vec::with_capacity(n);
    let mut theta_rad = Vec::with_capacity(n);

    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let t = t0 + u * (t1 - t0);
        time_s.push(t);
        theta_rad.push(fit.model.eval(t));
    }

    ModelGrid { time_s, theta_rad }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DampedModel, FitQuality};
    use crate::io::hash::hash_file;

    #[test]
    fn fit_json_round_trips() {
        let dir = std::env::temp_dir();
        let src = dir.join(format!("torfit-fitfile-src-{}", std::process::id()));
        let out = dir.join(format!("torfit-fitfile-{}.json", std::process::id()));
        std::fs::write(&src, "0.0,1.0,2.0\n").unwrap();

        let fit = FitResult {
            model: DampedModel {
                amplitude: 1.5,
                damping: 0.2,
                frequency: 4.0,
                phase: 0.3,
                offset: -0.1,
            },
            quality: FitQuality {
                sse: 0.01,
                rmse: 0.001,
                r_squared: 0.999,
                n: 100,
            },
        };
        let track = PolarTrack {
            time: vec![0.0, 5.0, 10.0],
            radius: vec![1.0, 1.0, 1.0],
            angle: vec![0.0, 0.1, 0.2],
        };
        let digest = hash_file(&src).unwrap();

        write_fit_json(&out, &fit, &digest, &track).unwrap();
        let loaded = read_fit_json(&out).unwrap();

        assert_eq!(loaded.tool, "torfit");
        assert_eq!(loaded.source_digest, digest.as_hex());
        assert_eq!(loaded.model, fit.model);
        assert_eq!(loaded.grid.time_s.len(), 201);
        assert!((loaded.grid.time_s[0] - 0.0).abs() < 1e-12);
        assert!((loaded.grid.time_s[200] - 10.0).abs() < 1e-12);
        // Grid values come from the saved model.
        assert!((loaded.grid.theta_rad[0] - fit.model.eval(0.0)).abs() < 1e-12);

        std::fs::remove_file(src).ok();
        std::fs::remove_file(out).ok();
    }
}
