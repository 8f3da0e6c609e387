//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - seed a search window for `(alpha, omega)` from the data
//! - evaluate each candidate pair (parallel) with a linear sub-solve
//! - refine the winner with deterministic grid-zoom passes

pub mod fitter;
pub mod grid;

pub use fitter::*;
pub use grid::*;
