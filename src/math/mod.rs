//! Mathematical utilities: polar conversion, finite differences, and
//! SVD least squares.

pub mod diff;
pub mod ols;
pub mod polar;

pub use diff::*;
pub use ols::*;
pub use polar::*;
