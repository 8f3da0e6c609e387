//! Capture-file ingest and normalization.
//!
//! This module turns a raw motion-capture export into a clean `Trajectory`
//! that is safe to transform and fit.
//!
//! Design goals:
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Tolerant layout handling**: the lab capture format carries two header
//!   lines before the `(time, x, y)` triples; plain headerless numeric files
//!   are accepted too
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::path::Path;

use crate::domain::{DatasetStats, Trajectory};
use crate::error::AppError;

/// Maximum number of leading lines treated as headers when they fail to
/// parse as numeric triples.
const HEADER_LINES: usize = 2;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based line number in the input file.
    pub line: usize,
    pub message: String,
}

/// Ingest output: the parsed trajectory + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedTrajectory {
    pub trajectory: Trajectory,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Leading non-numeric lines consumed silently as headers.
    pub rows_header: usize,
}

/// Load and validate a capture file into a `Trajectory`.
pub fn load_trajectory(path: &Path) -> Result<IngestedTrajectory, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut trajectory = Trajectory::default();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_header = 0usize;
    let mut last_time = f64::NEG_INFINITY;
    let mut columns = ColumnMap::default();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 1;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        // A named header row may reorder the columns.
        if line <= HEADER_LINES {
            if let Some(map) = ColumnMap::from_header(&record) {
                columns = map;
                rows_header += 1;
                continue;
            }
        }

        match parse_triple(&record, &columns) {
            Ok((t, x, y)) => {
                if t <= last_time {
                    row_errors.push(RowError {
                        line,
                        message: format!("Non-increasing time stamp {t} (previous {last_time})."),
                    });
                    continue;
                }
                last_time = t;
                trajectory.time.push(t);
                trajectory.x.push(x);
                trajectory.y.push(y);
            }
            Err(msg) => {
                // The capture export's header lines are not numeric; swallow
                // them silently, report anything later as a data defect.
                if line > HEADER_LINES {
                    row_errors.push(RowError { line, message: msg });
                } else {
                    rows_header += 1;
                }
            }
        }
    }

    let rows_used = trajectory.len();
    if rows_used == 0 {
        return Err(AppError::no_data(format!(
            "No usable (time, x, y) rows in '{}'.",
            path.display()
        )));
    }

    let stats = compute_stats(&trajectory);

    Ok(IngestedTrajectory {
        trajectory,
        stats,
        row_errors,
        rows_read,
        rows_used,
        rows_header,
    })
}

/// Column indices for `(time, x, y)` within a record.
///
/// Defaults to positional order; a recognized named header row overrides it.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    time: usize,
    x: usize,
    y: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self { time: 0, x: 1, y: 2 }
    }
}

impl ColumnMap {
    /// Recognize a named header row. All three columns must be present under
    /// a known alias for the row to count as a header.
    fn from_header(record: &csv::StringRecord) -> Option<Self> {
        let find = |names: &[&str]| {
            record
                .iter()
                .position(|f| names.contains(&f.trim().to_ascii_lowercase().as_str()))
        };

        Some(Self {
            time: find(&["t", "time", "time_s"])?,
            x: find(&["x", "x_m"])?,
            y: find(&["y", "y_m"])?,
        })
    }
}

fn parse_triple(record: &csv::StringRecord, columns: &ColumnMap) -> Result<(f64, f64, f64), String> {
    let t = parse_field(record, columns.time, "time")?;
    let x = parse_field(record, columns.x, "x")?;
    let y = parse_field(record, columns.y, "y")?;
    Ok((t, x, y))
}

fn parse_field(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing `{name}` value."))?;
    let v: f64 = raw
        .parse()
        .map_err(|_| format!("Invalid `{name}` value '{raw}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite `{name}` value '{raw}'."))
    }
}

fn compute_stats(traj: &Trajectory) -> DatasetStats {
    let mut stats = DatasetStats {
        n_points: traj.len(),
        time_min: f64::INFINITY,
        time_max: f64::NEG_INFINITY,
        x_min: f64::INFINITY,
        x_max: f64::NEG_INFINITY,
        y_min: f64::INFINITY,
        y_max: f64::NEG_INFINITY,
    };

    for i in 0..traj.len() {
        stats.time_min = stats.time_min.min(traj.time[i]);
        stats.time_max = stats.time_max.max(traj.time[i]);
        stats.x_min = stats.x_min.min(traj.x[i]);
        stats.x_max = stats.x_max.max(traj.x[i]);
        stats.y_min = stats.y_min.min(traj.y[i]);
        stats.y_max = stats.y_max.max(traj.y[i]);
    }

    stats
}
