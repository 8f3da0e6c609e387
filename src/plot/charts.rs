//! SVG diagnostic charts via Plotters.
//!
//! Four charts per analyzed capture:
//! - radial position vs time
//! - radial velocity vs time
//! - angle vs time with the fitted model overlaid
//! - residual error vs time
//!
//! We use the SVG backend so chart output needs no native font or raster
//! dependencies.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::domain::{DampedModel, FitFile, PolarTrack, ResidualPoint};
use crate::error::AppError;

/// Output pixel size of each chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 640,
        }
    }
}

/// Samples used when drawing the continuous model curve.
const MODEL_SAMPLES: usize = 400;

/// One named line series.
struct Series<'a> {
    label: &'a str,
    points: Vec<(f64, f64)>,
    color: RGBColor,
}

/// Render the four diagnostic charts for one capture.
///
/// Returns the paths written, in a stable order.
pub fn render_charts(
    dir: &Path,
    stem: &str,
    track: &PolarTrack,
    velocity: &[f64],
    model: &DampedModel,
    residuals: &[ResidualPoint],
    size: ChartSize,
) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::input(format!(
            "Failed to create chart directory '{}': {e}",
            dir.display()
        ))
    })?;

    let mut written = Vec::with_capacity(4);

    // 1) Radial position vs time.
    let position: Vec<(f64, f64)> = track
        .time
        .iter()
        .zip(track.radius.iter())
        .map(|(&t, &r)| (t, r))
        .collect();
    let path = dir.join(format!("{stem}_position.svg"));
    draw_chart(
        &path,
        "Radial position",
        "time (s)",
        "position (m)",
        &[Series {
            label: "r(t)",
            points: position,
            color: BLUE,
        }],
        size,
    )?;
    written.push(path);

    // 2) Radial velocity vs time.
    let vel: Vec<(f64, f64)> = track
        .time
        .iter()
        .zip(velocity.iter())
        .map(|(&t, &v)| (t, v))
        .collect();
    let path = dir.join(format!("{stem}_velocity.svg"));
    draw_chart(
        &path,
        "Radial velocity",
        "time (s)",
        "velocity (m/s)",
        &[Series {
            label: "dr/dt",
            points: vel,
            color: BLUE,
        }],
        size,
    )?;
    written.push(path);

    // 3) Angle vs time with fit overlay.
    let observed: Vec<(f64, f64)> = track
        .time
        .iter()
        .zip(track.angle.iter())
        .map(|(&t, &a)| (t, a))
        .collect();
    let fitted = sample_model(model, &track.time);
    let path = dir.join(format!("{stem}_angle_fit.svg"));
    draw_chart(
        &path,
        "Angular position and damped-sinusoid fit",
        "time (s)",
        "angle (rad)",
        &[
            Series {
                label: "data",
                points: observed,
                color: BLUE,
            },
            Series {
                label: "fit",
                points: fitted,
                color: RED,
            },
        ],
        size,
    )?;
    written.push(path);

    // 4) Residual error vs time.
    let errs: Vec<(f64, f64)> = residuals.iter().map(|r| (r.time, r.residual)).collect();
    let path = dir.join(format!("{stem}_residuals.svg"));
    draw_chart(
        &path,
        "Fit residuals",
        "time (s)",
        "error (rad)",
        &[Series {
            label: "residual",
            points: errs,
            color: RED,
        }],
        size,
    )?;
    written.push(path);

    Ok(written)
}

/// Re-render the model curve chart from a saved fit file (no observed data).
pub fn render_chart_from_fit_file(
    dir: &Path,
    stem: &str,
    file: &FitFile,
    size: ChartSize,
) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::input(format!(
            "Failed to create chart directory '{}': {e}",
            dir.display()
        ))
    })?;

    let curve: Vec<(f64, f64)> = file
        .grid
        .time_s
        .iter()
        .zip(file.grid.theta_rad.iter())
        .map(|(&t, &theta)| (t, theta))
        .collect();

    let path = dir.join(format!("{stem}_model.svg"));
    draw_chart(
        &path,
        "Fitted damped sinusoid",
        "time (s)",
        "angle (rad)",
        &[Series {
            label: "model",
            points: curve,
            color: RED,
        }],
        size,
    )?;
    Ok(path)
}

fn sample_model(model: &DampedModel, time: &[f64]) -> Vec<(f64, f64)> {
    let t0 = time.first().copied().unwrap_or(0.0);
    let t1 = time.last().copied().unwrap_or(1.0);
    let n = MODEL_SAMPLES.max(2);

    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let t = t0 + u * (t1 - t0);
            (t, model.eval(t))
        })
        .collect()
}

fn draw_chart(
    path: &Path,
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &[Series<'_>],
    size: ChartSize,
) -> Result<(), AppError> {
    draw_chart_inner(path, title, x_label, y_label, series, size).map_err(|e| {
        AppError::input(format!("Failed to render chart '{}': {e}", path.display()))
    })
}

fn draw_chart_inner(
    path: &Path,
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &[Series<'_>],
    size: ChartSize,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x_range, y_range) = bounds(series).ok_or("empty chart data")?;

    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_labels(8)
        .y_labels(6)
        .label_style(("sans-serif", 14))
        .draw()?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), &color))?
            .label(s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", 14))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn bounds(series: &[Series<'_>]) -> Option<(std::ops::Range<f64>, std::ops::Range<f64>)> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for s in series {
        for &(x, y) in &s.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }
    if x_max <= x_min || y_max <= y_min {
        return None;
    }

    let y_pad = (y_max - y_min) * 0.05;
    Some((x_min..x_max, (y_min - y_pad)..(y_max + y_pad)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charts_are_written_for_a_synthetic_track() {
        let dir = std::env::temp_dir().join(format!("torfit-charts-{}", std::process::id()));

        let model = DampedModel {
            amplitude: 1.0,
            damping: 0.1,
            frequency: 3.0,
            phase: 0.0,
            offset: 0.0,
        };
        let time: Vec<f64> = (0..100).map(|i| i as f64 * 0.05).collect();
        let angle: Vec<f64> = time.iter().map(|&t| model.eval(t)).collect();
        let track = PolarTrack {
            time: time.clone(),
            radius: vec![0.15; 100],
            angle: angle.clone(),
        };
        let velocity = vec![0.0; 100];
        let residuals: Vec<ResidualPoint> = time
            .iter()
            .zip(angle.iter())
            .map(|(&t, &a)| ResidualPoint {
                time: t,
                theta_obs: a,
                theta_fit: a,
                residual: 0.0,
            })
            .collect();

        let written = render_charts(
            &dir,
            "sample",
            &track,
            &velocity,
            &model,
            &residuals,
            ChartSize::default(),
        )
        .unwrap();

        assert_eq!(written.len(), 4);
        for path in &written {
            let meta = std::fs::metadata(path).unwrap();
            assert!(meta.len() > 0, "empty chart file {}", path.display());
        }

        std::fs::remove_dir_all(dir).ok();
    }
}
