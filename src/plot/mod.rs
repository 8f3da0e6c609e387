//! Plot rendering.
//!
//! - `ascii`: deterministic terminal quick-look (angle + fit overlay)
//! - `charts`: SVG diagnostics via Plotters (position, velocity, angle+fit,
//!   residuals)

pub mod ascii;
pub mod charts;

pub use ascii::*;
pub use charts::*;
