//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and polar trajectory series (`Trajectory`, `PolarTrack`)
//! - the fitted damped-oscillation model (`DampedModel`)
//! - fit outputs (`FitResult`, `FitQuality`, `ResidualPoint`)
//! - run configuration (`AnalyzeConfig`)

pub mod types;

pub use types::*;
