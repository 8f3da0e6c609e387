//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed angles: `o`
//! - fitted model: `-` line
//! - optional highlights: `x` (largest residuals)

use crate::domain::{DampedModel, FitFile, ResidualPoint};

/// Render the angle-vs-time plot with the fitted model overlaid.
pub fn render_ascii_plot(
    residuals: &[ResidualPoint],
    model: &DampedModel,
    width: usize,
    height: usize,
    outliers: Option<&[ResidualPoint]>,
) -> String {
    let (t_min, t_max) = time_range(residuals).unwrap_or((0.0, 1.0));
    let curve = sample_model(model, t_min, t_max, width.max(2));
    let points: Vec<(f64, f64)> = residuals.iter().map(|r| (r.time, r.theta_obs)).collect();
    let highlights: Vec<f64> = outliers
        .map(|o| o.iter().map(|r| r.time).collect())
        .unwrap_or_default();

    render_plot(&points, Some(&curve), &highlights, t_min, t_max, width, height)
}

/// Render a plot from a saved fit JSON file (model grid only, no overlay).
pub fn render_ascii_plot_from_fit_file(file: &FitFile, width: usize, height: usize) -> String {
    let curve: Vec<(f64, f64)> = file
        .grid
        .time_s
        .iter()
        .zip(file.grid.theta_rad.iter())
        .map(|(&t, &theta)| (t, theta))
        .collect();
    let (t_min, t_max) = series_time_range(&curve).unwrap_or((0.0, 1.0));

    render_plot(&[], Some(&curve), &[], t_min, t_max, width, height)
}

fn render_plot(
    points: &[(f64, f64)],
    curve: Option<&[(f64, f64)]>,
    highlight_times: &[f64],
    t_min: f64,
    t_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = theta_range(points, curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    if let Some(curve) = curve {
        draw_curve(&mut grid, curve, t_min, t_max, y_min, y_max);
    }

    for &(t, theta) in points {
        let x = map_x(t, t_min, t_max, width);
        let y = map_y(theta, y_min, y_max, height);

        let ch = if highlight_times.iter().any(|&h| h == t) {
            'x'
        } else {
            'o'
        };
        grid[y][x] = ch;
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: t=[{t_min:.3}, {t_max:.3}] s | theta=[{y_min:.2}, {y_max:.2}] rad\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn time_range(residuals: &[ResidualPoint]) -> Option<(f64, f64)> {
    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for r in residuals {
        min_t = min_t.min(r.time);
        max_t = max_t.max(r.time);
    }
    if min_t.is_finite() && max_t.is_finite() && max_t > min_t {
        Some((min_t, max_t))
    } else {
        None
    }
}

fn series_time_range(series: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for &(t, _) in series {
        min_t = min_t.min(t);
        max_t = max_t.max(t);
    }
    if min_t.is_finite() && max_t.is_finite() && max_t > min_t {
        Some((min_t, max_t))
    } else {
        None
    }
}

fn sample_model(model: &DampedModel, t_min: f64, t_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let t = t_min + u * (t_max - t_min);
        out.push((t, model.eval(t)));
    }
    out
}

fn theta_range(points: &[(f64, f64)], curve: Option<&[(f64, f64)]>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, theta) in points {
        min_y = min_y.min(theta);
        max_y = max_y.max(theta);
    }
    if let Some(curve) = curve {
        for &(_, theta) in curve {
            min_y = min_y.min(theta);
            max_y = max_y.max(theta);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(theta: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((theta - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // theta=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, theta) in curve {
        let x = map_x(t, t_min, t_max, width);
        let y = map_y(theta, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let flat = DampedModel {
            amplitude: 0.0,
            damping: 0.0,
            frequency: 1.0,
            phase: 0.0,
            offset: 0.0,
        };
        let residuals = vec![
            ResidualPoint {
                time: 1.0,
                theta_obs: 0.0,
                theta_fit: 0.0,
                residual: 0.0,
            },
            ResidualPoint {
                time: 10.0,
                theta_obs: 1.0,
                theta_fit: 0.0,
                residual: 1.0,
            },
        ];

        let txt = render_ascii_plot(&residuals, &flat, 10, 5, None);
        let expected = concat!(
            "Plot: t=[1.000, 10.000] s | theta=[-0.05, 1.05] rad\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn highlighted_outliers_use_a_distinct_marker() {
        let flat = DampedModel {
            amplitude: 0.0,
            damping: 0.0,
            frequency: 1.0,
            phase: 0.0,
            offset: 0.0,
        };
        let residuals = vec![
            ResidualPoint {
                time: 0.0,
                theta_obs: 0.0,
                theta_fit: 0.0,
                residual: 0.0,
            },
            ResidualPoint {
                time: 5.0,
                theta_obs: 1.0,
                theta_fit: 0.0,
                residual: 1.0,
            },
        ];
        let outliers = vec![residuals[1].clone()];

        let txt = render_ascii_plot(&residuals, &flat, 12, 6, Some(&outliers));
        assert!(txt.contains('x'));
    }
}
