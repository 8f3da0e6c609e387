//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use std::path::Path;

use crate::domain::{FitResult, ResidualPoint};
use crate::io::cache::CachedParse;
use crate::physics::TorsionEstimate;

/// Format the full run summary for one capture file.
pub fn format_run_summary(
    path: &Path,
    parse: &CachedParse,
    fit: &FitResult,
    torsion: &TorsionEstimate,
) -> String {
    let mut out = String::new();
    let ingest = &parse.ingest;

    out.push_str(&format!("=== torfit - {} ===\n", path.display()));
    out.push_str(&format!(
        "Digest: {} ({})\n",
        parse.digest.short(),
        if parse.hit { "cached" } else { "parsed" }
    ));
    out.push_str(&format!(
        "Rows: read={} used={} headers={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.rows_header,
        ingest.row_errors.len()
    ));
    out.push_str(&format!(
        "Span: t=[{:.3}, {:.3}]s | x=[{:.4}, {:.4}] | y=[{:.4}, {:.4}]\n",
        ingest.stats.time_min,
        ingest.stats.time_max,
        ingest.stats.x_min,
        ingest.stats.x_max,
        ingest.stats.y_min,
        ingest.stats.y_max
    ));

    out.push_str("\nFitted model: theta(t) = A exp(-a t) sin(w t + p) + theta0\n");
    out.push_str(&format!("- A      = {:.6} rad\n", fit.model.amplitude));
    out.push_str(&format!("- alpha  = {:.6} 1/s\n", fit.model.damping));
    out.push_str(&format!("- omega  = {:.6} rad/s\n", fit.model.frequency));
    out.push_str(&format!("- phi    = {:.6} rad\n", fit.model.phase));
    out.push_str(&format!("- theta0 = {:.6} rad\n", fit.model.offset));
    out.push_str(&format!(
        "Quality: n={} RMSE={:.6} rad R^2={:.5}\n",
        fit.quality.n, fit.quality.rmse, fit.quality.r_squared
    ));

    out.push_str("\nDerived quantities:\n");
    out.push_str(&format!("- I     = {:.6e} kg m^2\n", torsion.inertia));
    out.push_str(&format!(
        "- kappa = I(w^2 + a^2) = {:.6e} N m/rad\n",
        torsion.kappa
    ));
    out.push_str(&format!("- T     = {:.4} s\n", torsion.period));
    out.push_str(&format!("- Q     = {:.2}\n", torsion.quality_factor));

    out
}

/// Compact one-block output for the `fit` subcommand (scripting-friendly).
pub fn format_fit_compact(path: &Path, fit: &FitResult, torsion: &TorsionEstimate) -> String {
    format!(
        "{}: A={:.6} alpha={:.6} omega={:.6} phi={:.6} theta0={:.6} kappa={:.6e} rmse={:.6}\n",
        path.display(),
        fit.model.amplitude,
        fit.model.damping,
        fit.model.frequency,
        fit.model.phase,
        fit.model.offset,
        torsion.kappa,
        fit.quality.rmse
    )
}

/// Format the largest-residual samples as a small table.
pub fn format_outliers(outliers: &[ResidualPoint]) -> String {
    let mut out = String::new();
    if outliers.is_empty() {
        return out;
    }

    out.push_str("Largest residuals:\n");
    out.push_str(&format!(
        "{:>10} {:>12} {:>12} {:>12}\n",
        "time_s", "theta_obs", "theta_fit", "residual"
    ));
    for r in outliers {
        out.push_str(&format!(
            "{:>10.3} {:>12.6} {:>12.6} {:>12.6}\n",
            r.time, r.theta_obs, r.theta_fit, r.residual
        ));
    }
    out
}

/// Format row-level ingest problems, capped to keep the terminal readable.
pub fn format_row_errors(errors: &[crate::io::ingest::RowError]) -> String {
    const MAX_SHOWN: usize = 10;

    let mut out = String::new();
    if errors.is_empty() {
        return out;
    }

    out.push_str(&format!("Skipped rows ({}):\n", errors.len()));
    for e in errors.iter().take(MAX_SHOWN) {
        out.push_str(&format!("- line {}: {}\n", e.line, e.message));
    }
    if errors.len() > MAX_SHOWN {
        out.push_str(&format!("- ... and {} more\n", errors.len() - MAX_SHOWN));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DampedModel, FitQuality};
    use crate::io::cache::ParseCache;
    use crate::io::ingest::RowError;
    use crate::physics::estimate_torsion;

    #[test]
    fn run_summary_counts_headers_separately_from_skipped_rows() {
        let path = std::env::temp_dir().join(format!("torfit-summary-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "Torsion capture v2\ntime,x,y\n0.0,0.10,0.20\n0.1,0.11,0.19\n",
        )
        .unwrap();
        let parse = ParseCache::new().get_or_load(&path).unwrap();

        let model = DampedModel {
            amplitude: 1.0,
            damping: 0.1,
            frequency: 3.0,
            phase: 0.0,
            offset: 0.0,
        };
        let fit = FitResult {
            model,
            quality: FitQuality {
                sse: 0.01,
                rmse: 0.001,
                r_squared: 0.999,
                n: 2,
            },
        };
        let torsion = estimate_torsion(1.0e-3, &model);

        let txt = format_run_summary(&path, &parse, &fit, &torsion);
        assert!(txt.contains("Rows: read=4 used=2 headers=2 skipped=0"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn outlier_table_lists_each_sample() {
        let outliers = vec![ResidualPoint {
            time: 1.25,
            theta_obs: 0.5,
            theta_fit: 0.4,
            residual: 0.1,
        }];
        let txt = format_outliers(&outliers);
        assert!(txt.contains("Largest residuals"));
        assert!(txt.contains("1.250"));
    }

    #[test]
    fn row_errors_are_capped() {
        let errors: Vec<RowError> = (0..15)
            .map(|i| RowError {
                line: i + 3,
                message: "Missing `x` value.".to_string(),
            })
            .collect();
        let txt = format_row_errors(&errors);
        assert!(txt.contains("Skipped rows (15)"));
        assert!(txt.contains("... and 5 more"));
    }
}
