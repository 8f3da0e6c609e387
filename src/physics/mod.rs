//! Physical-constant bookkeeping for the torsion apparatus.
//!
//! The oscillator is a rod hanging from a torsion wire with a rectangular
//! block mounted off-axis. The moment of inertia of that assembly converts
//! the fitted `(omega, alpha)` into the torsion constant:
//!
//! ```text
//! kappa = I * (omega^2 + alpha^2)
//! ```

use std::f64::consts::PI;

use crate::domain::DampedModel;

/// Geometry and masses of the torsion-pendulum rig, SI units.
///
/// Defaults are the measured values of the lab apparatus the capture files
/// come from.
#[derive(Debug, Clone, Copy)]
pub struct Apparatus {
    /// Torsion wire length (m). Recorded for provenance; it does not enter
    /// the inertia calculation.
    pub wire_length: f64,

    /// Hanging rod length (m).
    pub rod_length: f64,
    /// Hanging rod diameter (m).
    pub rod_diameter: f64,
    /// Rod material density (kg/m^3).
    pub rod_density: f64,

    /// Mounted block dimensions (m) and mass (kg).
    pub block_length: f64,
    pub block_width: f64,
    pub block_height: f64,
    pub block_mass: f64,

    /// Distance from the rotation axis to the block center (m).
    pub mount_offset: f64,
}

impl Default for Apparatus {
    fn default() -> Self {
        Self {
            wire_length: 157e-3,
            rod_length: 305e-3,
            rod_diameter: 10e-3,
            rod_density: 500.0,
            block_length: 131e-3,
            block_width: 19e-3,
            block_height: 25e-3,
            block_mass: 514.15e-3,
            mount_offset: 281e-3 / 2.0,
        }
    }
}

impl Apparatus {
    /// Rod mass from its volume and density.
    pub fn rod_mass(&self) -> f64 {
        let r = self.rod_diameter / 2.0;
        self.rod_density * self.rod_length * PI * r * r
    }

    /// Moment of inertia of the full assembly (kg m^2).
    ///
    /// Rod term uses the lab's convention `I_rod = 1/2 m L^2`; the block is a
    /// cuboid about its center plus the parallel-axis offset term.
    pub fn moment_of_inertia(&self) -> f64 {
        let i_rod = 0.5 * self.rod_mass() * self.rod_length * self.rod_length;
        let i_block = self.block_mass
            * self.block_height
            * (self.block_length * self.block_length + self.block_width * self.block_width)
            / 12.0
            + self.block_mass * self.mount_offset * self.mount_offset;
        i_rod + i_block
    }
}

/// Physical quantities derived from a fitted model.
#[derive(Debug, Clone, Copy)]
pub struct TorsionEstimate {
    /// Moment of inertia used (kg m^2).
    pub inertia: f64,
    /// Torsion constant kappa (N m / rad).
    pub kappa: f64,
    /// Damped oscillation period (s).
    pub period: f64,
    /// Quality factor `omega / (2 alpha)`.
    pub quality_factor: f64,
}

/// Derive the torsion constant and related diagnostics from a fit.
pub fn estimate_torsion(inertia: f64, model: &DampedModel) -> TorsionEstimate {
    let omega = model.frequency;
    let alpha = model.damping;
    TorsionEstimate {
        inertia,
        kappa: inertia * (omega * omega + alpha * alpha),
        period: 2.0 * PI / omega,
        quality_factor: omega / (2.0 * alpha),
    }
}
