//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads capture files through the content-addressed parse cache
//! - runs the polar transform + damped-sinusoid fit
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, PlotArgs};
use crate::domain::AnalyzeConfig;
use crate::error::AppError;
use crate::io::cache::ParseCache;
use crate::plot::charts::ChartSize;

pub mod pipeline;

/// Entry point for the `torfit` binary.
pub fn run() -> Result<(), AppError> {
    // We want `torfit capture.csv` to behave like `torfit analyze capture.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args, OutputMode::Full),
        Command::Fit(args) => handle_analyze(args, OutputMode::FitOnly),
        Command::Plot(args) => handle_plot(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    FitOnly,
}

fn handle_analyze(args: AnalyzeArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = analyze_config_from_args(&args);

    if config.inputs.len() > 1 && (config.export_results.is_some() || config.export_fit.is_some()) {
        return Err(AppError::input(
            "--export/--export-fit require exactly one input file.",
        ));
    }

    // One cache across all inputs, so duplicate contents parse once.
    let mut cache = ParseCache::new();

    for (i, path) in config.inputs.iter().enumerate() {
        let run = pipeline::run_analysis(&config, &mut cache, path)?;

        if i > 0 && mode == OutputMode::Full {
            println!();
        }

        match mode {
            OutputMode::Full => {
                println!(
                    "{}",
                    crate::report::format_run_summary(path, &run.parse, &run.fit, &run.torsion)
                );
                let row_errors = crate::report::format_row_errors(&run.parse.ingest.row_errors);
                if !row_errors.is_empty() {
                    println!("{row_errors}");
                }
                let outliers = crate::report::format_outliers(&run.outliers);
                if !outliers.is_empty() {
                    println!("{outliers}");
                }
            }
            OutputMode::FitOnly => {
                print!(
                    "{}",
                    crate::report::format_fit_compact(path, &run.fit, &run.torsion)
                );
            }
        }

        if mode == OutputMode::Full && config.ascii_plot {
            let plot = crate::plot::render_ascii_plot(
                &run.residuals,
                &run.fit.model,
                config.ascii_width,
                config.ascii_height,
                Some(&run.outliers),
            );
            println!("{plot}");
        }

        if let (OutputMode::Full, Some(dir)) = (mode, &config.charts_dir) {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "capture".to_string());
            let written = crate::plot::charts::render_charts(
                dir,
                &stem,
                &run.track,
                &run.velocity,
                &run.fit.model,
                &run.residuals,
                ChartSize {
                    width: config.chart_width,
                    height: config.chart_height,
                },
            )?;
            for p in written {
                println!("Wrote {}", p.display());
            }
        }

        // Optional exports.
        if let Some(out) = &config.export_results {
            crate::io::export::write_results_csv(out, &run.residuals, &run.parse.digest)?;
        }
        if let Some(out) = &config.export_fit {
            crate::io::fit_file::write_fit_json(out, &run.fit, &run.parse.digest, &run.track)?;
        }
    }

    if mode == OutputMode::Full && config.inputs.len() > 1 {
        println!(
            "\nParse cache: {} file(s), {} parsed, {} served from cache",
            config.inputs.len(),
            cache.misses(),
            cache.hits()
        );
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let fit_file = crate::io::fit_file::read_fit_json(&args.fit)?;

    let plot = crate::plot::render_ascii_plot_from_fit_file(&fit_file, args.width, args.height);
    println!("{plot}");

    if let Some(dir) = &args.charts {
        let stem = args
            .fit
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "fit".to_string());
        let written = crate::plot::charts::render_chart_from_fit_file(
            dir,
            &stem,
            &fit_file,
            ChartSize {
                width: args.chart_width,
                height: args.chart_height,
            },
        )?;
        println!("Wrote {}", written.display());
    }

    Ok(())
}

pub fn analyze_config_from_args(args: &AnalyzeArgs) -> AnalyzeConfig {
    AnalyzeConfig {
        inputs: args.inputs.clone(),
        alpha_min: args.alpha_min,
        alpha_max: args.alpha_max,
        alpha_steps: args.alpha_steps,
        omega_span: args.omega_span,
        omega_steps: args.omega_steps,
        refine_passes: args.refine_passes,
        unwrap_angles: args.unwrap,
        inertia_override: args.inertia,
        top_n: args.top,
        ascii_plot: !args.no_plot,
        ascii_width: args.width,
        ascii_height: args.height,
        charts_dir: if args.no_charts {
            None
        } else {
            Some(args.charts.clone())
        },
        chart_width: args.chart_width,
        chart_height: args.chart_height,
        export_results: args.export.clone(),
        export_fit: args.export_fit.clone(),
    }
}

/// Rewrite argv so `torfit FILE...` defaults to `torfit analyze FILE...`.
///
/// Rules:
/// - `torfit capture.csv`          -> `torfit analyze capture.csv`
/// - `torfit --unwrap capture.csv` -> `torfit analyze --unwrap capture.csv`
/// - `torfit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "fit" | "plot");
    if is_subcommand {
        return argv;
    }

    // A flag or a file path first means "analyze it".
    argv.insert(1, "analyze".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_file_arguments_get_the_analyze_subcommand() {
        let out = rewrite_args(argv(&["torfit", "capture.csv"]));
        assert_eq!(out, argv(&["torfit", "analyze", "capture.csv"]));
    }

    #[test]
    fn leading_flags_get_the_analyze_subcommand() {
        let out = rewrite_args(argv(&["torfit", "--unwrap", "capture.csv"]));
        assert_eq!(out, argv(&["torfit", "analyze", "--unwrap", "capture.csv"]));
    }

    #[test]
    fn explicit_subcommands_pass_through() {
        let out = rewrite_args(argv(&["torfit", "plot", "--fit", "out.json"]));
        assert_eq!(out, argv(&["torfit", "plot", "--fit", "out.json"]));
    }

    #[test]
    fn help_and_version_pass_through() {
        for flag in ["-h", "--help", "-V", "--version", "help"] {
            let out = rewrite_args(argv(&["torfit", flag]));
            assert_eq!(out, argv(&["torfit", flag]));
        }
    }

    #[test]
    fn no_arguments_pass_through_for_usage_error() {
        let out = rewrite_args(argv(&["torfit"]));
        assert_eq!(out, argv(&["torfit"]));
    }
}
