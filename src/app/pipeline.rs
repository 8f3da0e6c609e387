//! End-to-end analysis pipeline for one capture file.
//!
//! The pipeline is pure orchestration: load (through the cache), transform to
//! polar, fit, then derive residuals and physical quantities. Keeping it free
//! of printing makes it reusable by both `analyze` and `fit`, and easy to
//! test on synthetic files.

use std::path::{Path, PathBuf};

use crate::domain::{AnalyzeConfig, FitResult, PolarTrack, ResidualPoint};
use crate::error::AppError;
use crate::fit::fitter::{FitOptions, fit_damped};
use crate::fit::grid::seed_window;
use crate::io::cache::{CachedParse, ParseCache};
use crate::math::{differentiate, polar_track, unwrap_angles};
use crate::physics::{Apparatus, TorsionEstimate, estimate_torsion};
use crate::report::{compute_residuals, rank_outliers};

/// Everything computed for one capture file.
#[derive(Debug)]
pub struct AnalysisOutput {
    pub path: PathBuf,
    pub parse: CachedParse,
    pub track: PolarTrack,
    /// Radial velocity (m/s) from central differences of `track.radius`.
    pub velocity: Vec<f64>,
    pub fit: FitResult,
    pub residuals: Vec<ResidualPoint>,
    pub outliers: Vec<ResidualPoint>,
    pub torsion: TorsionEstimate,
}

/// Run the full analysis for one capture file.
pub fn run_analysis(
    config: &AnalyzeConfig,
    cache: &mut ParseCache,
    path: &Path,
) -> Result<AnalysisOutput, AppError> {
    let parse = cache.get_or_load(path)?;

    let mut track = polar_track(&parse.ingest.trajectory);
    if config.unwrap_angles {
        unwrap_angles(&mut track.angle);
    }

    let velocity = differentiate(&track.time, &track.radius);

    let window = seed_window(
        &track.time,
        &track.angle,
        config.alpha_min,
        config.alpha_max,
        config.omega_span,
    )?;
    let opts = FitOptions {
        alpha_steps: config.alpha_steps,
        omega_steps: config.omega_steps,
        refine_passes: config.refine_passes,
    };
    let fit = fit_damped(&track.time, &track.angle, &window, &opts)?;

    let residuals = compute_residuals(&track, &fit.model)?;
    let outliers = rank_outliers(&residuals, config.top_n);

    let inertia = config
        .inertia_override
        .unwrap_or_else(|| Apparatus::default().moment_of_inertia());
    let torsion = estimate_torsion(inertia, &fit.model);

    Ok(AnalysisOutput {
        path: path.to_path_buf(),
        parse,
        track,
        velocity,
        fit,
        residuals,
        outliers,
        torsion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(path: &Path) -> AnalyzeConfig {
        AnalyzeConfig {
            inputs: vec![path.to_path_buf()],
            alpha_min: None,
            alpha_max: None,
            alpha_steps: 20,
            omega_span: 0.5,
            omega_steps: 41,
            refine_passes: 2,
            unwrap_angles: false,
            inertia_override: None,
            top_n: 5,
            ascii_plot: false,
            ascii_width: 80,
            ascii_height: 20,
            charts_dir: None,
            chart_width: 640,
            chart_height: 480,
            export_results: None,
            export_fit: None,
        }
    }

    fn write_synthetic_capture(name: &str) -> PathBuf {
        // Damped rotation at fixed radius: x = r sin(theta), y = r cos(theta),
        // so atan2(x, y) recovers theta exactly.
        let path = std::env::temp_dir().join(format!("torfit-pipeline-{}-{name}", std::process::id()));
        let r = 0.15;
        let (amp, alpha, omega, phase) = (0.8, 0.12, 3.5, 0.4);

        let mut body = String::from("Torsion capture\ntime,x,y\n");
        for i in 0..600 {
            let t = i as f64 * 0.02;
            let theta = amp * (-alpha * t).exp() * (omega * t + phase).sin();
            body.push_str(&format!(
                "{t:.4},{:.8},{:.8}\n",
                r * theta.sin(),
                r * theta.cos()
            ));
        }
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn pipeline_recovers_synthetic_parameters() {
        let path = write_synthetic_capture("recover.csv");
        let config = test_config(&path);
        let mut cache = ParseCache::new();

        let run = run_analysis(&config, &mut cache, &path).unwrap();

        assert!(!run.parse.hit);
        assert_eq!(run.track.time.len(), 600);
        assert_eq!(run.velocity.len(), 600);
        assert_eq!(run.outliers.len(), 5);

        assert!((run.fit.model.frequency - 3.5).abs() < 0.05);
        assert!((run.fit.model.damping - 0.12).abs() < 0.05);
        assert!(run.fit.quality.r_squared > 0.99);

        // kappa = I (omega^2 + alpha^2) with the built-in apparatus inertia.
        let inertia = Apparatus::default().moment_of_inertia();
        let expected = inertia
            * (run.fit.model.frequency * run.fit.model.frequency
                + run.fit.model.damping * run.fit.model.damping);
        assert!((run.torsion.kappa - expected).abs() < 1e-12);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn second_run_of_the_same_file_is_a_cache_hit() {
        let path = write_synthetic_capture("cached.csv");
        let config = test_config(&path);
        let mut cache = ParseCache::new();

        let first = run_analysis(&config, &mut cache, &path).unwrap();
        let second = run_analysis(&config, &mut cache, &path).unwrap();

        assert!(!first.parse.hit);
        assert!(second.parse.hit);
        assert_eq!(cache.misses(), 1);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn inertia_override_feeds_the_torsion_estimate() {
        let path = write_synthetic_capture("inertia.csv");
        let mut config = test_config(&path);
        config.inertia_override = Some(2.5e-3);
        let mut cache = ParseCache::new();

        let run = run_analysis(&config, &mut cache, &path).unwrap();
        assert!((run.torsion.inertia - 2.5e-3).abs() < 1e-15);

        std::fs::remove_file(path).ok();
    }
}
