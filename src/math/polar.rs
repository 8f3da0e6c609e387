//! Cartesian-to-polar conversion for recorded trajectories.
//!
//! The capture rig reports `(x, y)` positions of a marker on the oscillating
//! rod. The angle convention follows the lab setup: `theta = atan2(x, y)`,
//! i.e. zero along the +y axis with positive angles toward +x.

use std::f64::consts::{PI, TAU};

use crate::domain::{PolarTrack, Trajectory};

/// Convert a single `(x, y)` pair to `(radius, angle)`.
pub fn to_polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), x.atan2(y))
}

/// Convert a whole trajectory to polar form, sharing the time base.
pub fn polar_track(traj: &Trajectory) -> PolarTrack {
    let mut radius = Vec::with_capacity(traj.len());
    let mut angle = Vec::with_capacity(traj.len());

    for (&x, &y) in traj.x.iter().zip(traj.y.iter()) {
        let (r, theta) = to_polar(x, y);
        radius.push(r);
        angle.push(theta);
    }

    PolarTrack {
        time: traj.time.clone(),
        radius,
        angle,
    }
}

/// Remove 2*pi discontinuities from an angle series in place.
///
/// `atan2` wraps at +/-pi; a marker swinging past the -y axis produces a jump
/// of ~2*pi between consecutive samples. Unwrapping accumulates a correction
/// so the series is continuous, which matters for release angles near or past
/// 180 degrees.
pub fn unwrap_angles(angles: &mut [f64]) {
    let mut correction = 0.0;
    for i in 1..angles.len() {
        let raw = angles[i] + correction;
        let delta = raw - angles[i - 1];
        if delta > PI {
            correction -= TAU;
        } else if delta < -PI {
            correction += TAU;
        }
        angles[i] += correction;
    }
}
