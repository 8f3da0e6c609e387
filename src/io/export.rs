//! Export per-sample results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ResidualPoint;
use crate::error::AppError;
use crate::io::hash::FileDigest;

/// Write per-sample fit results to a CSV file.
pub fn write_results_csv(
    path: &Path,
    residuals: &[ResidualPoint],
    digest: &FileDigest,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "# source_digest: {digest}")
        .map_err(|e| AppError::input(format!("Failed to write export CSV: {e}")))?;
    writeln!(file, "time_s,theta_obs_rad,theta_fit_rad,residual_rad")
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writeln!(
            file,
            "{:.6},{:.10},{:.10},{:.10}",
            r.time, r.theta_obs, r.theta_fit, r.residual
        )
        .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::hash::hash_file;

    #[test]
    fn export_writes_header_and_rows() {
        let dir = std::env::temp_dir();
        let src = dir.join(format!("torfit-export-src-{}", std::process::id()));
        let out = dir.join(format!("torfit-export-out-{}.csv", std::process::id()));
        std::fs::write(&src, "0.0,1.0,2.0\n").unwrap();

        let digest = hash_file(&src).unwrap();
        let residuals = vec![
            ResidualPoint {
                time: 0.0,
                theta_obs: 0.5,
                theta_fit: 0.45,
                residual: 0.05,
            },
            ResidualPoint {
                time: 0.1,
                theta_obs: 0.4,
                theta_fit: 0.42,
                residual: -0.02,
            },
        ];

        write_results_csv(&out, &residuals, &digest).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();

        assert!(text.starts_with(&format!("# source_digest: {digest}")));
        assert!(text.contains("time_s,theta_obs_rad,theta_fit_rad,residual_rad"));
        assert_eq!(text.lines().count(), 4);

        std::fs::remove_file(src).ok();
        std::fs::remove_file(out).ok();
    }
}
