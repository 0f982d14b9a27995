#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for mecanum-drive robot kinematics."]
#![doc = ""]
#![doc = "This crate provides a dense matrix kernel, the forward kinematics of an"]
#![doc = "X-configuration mecanum drive, the diagonal speed correction applied to its"]
#![doc = "output, and the unit table used to place robots on the field."]

use core::fmt;
use libm::{atan2, hypot};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod correction;
pub mod error;
pub mod matrix;
pub mod mecanum;
pub mod units;

pub use correction::correct_speed;
pub use error::KinematicsError;
pub use matrix::Matrix;
pub use mecanum::{ForwardKinematics, MecanumDrive};
pub use units::{FieldCalibration, Unit};

/// A 2‑D pose `(x, y, θ)` in field pixels and radians.
///
/// Heading is accumulated as-is and never wrapped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World‑frame x position.
    pub x: f64,
    /// World‑frame y position.
    pub y: f64,
    /// Heading (rad).
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: World-frame x position.
    /// * `y`: World-frame y position.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// A robot-frame displacement `(Δx, Δy, Δθ)` produced by forward kinematics.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Displacement {
    /// Displacement along the robot's x-axis.
    pub dx: f64,
    /// Displacement along the robot's y-axis.
    pub dy: f64,
    /// Change in heading (rad).
    pub dtheta: f64,
}

impl Displacement {
    /// Construct a displacement.
    pub const fn new(dx: f64, dy: f64, dtheta: f64) -> Self {
        Displacement { dx, dy, dtheta }
    }

    /// Planar length `hypot(dx, dy)`.
    pub fn distance(&self) -> f64 {
        hypot(self.dx, self.dy)
    }

    /// Planar direction `atan2(dy, dx)` in radians.
    pub fn direction(&self) -> f64 {
        atan2(self.dy, self.dx)
    }
}

impl From<Displacement> for [f64; 3] {
    fn from(d: Displacement) -> Self {
        [d.dx, d.dy, d.dtheta]
    }
}

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Δx: {:.4}, Δy: {:.4}, Δθ: {:.4} rad)", self.dx, self.dy, self.dtheta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_displacement_polar_form() {
        let d = Displacement::new(3.0, 4.0, 0.1);
        assert!((d.distance() - 5.0).abs() < EPSILON);
        assert!((d.direction() - (4.0_f64).atan2(3.0)).abs() < EPSILON);

        let lateral = Displacement::new(0.0, 2.0, 0.0);
        assert!((lateral.direction() - FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_displacement_into_array() {
        let arr: [f64; 3] = Displacement::new(1.0, -2.0, 0.5).into();
        assert_eq!(arr, [1.0, -2.0, 0.5]);
    }

    #[test]
    fn test_pose_display() {
        let pose = Pose::new(72.0, 36.5, 0.0);
        assert_eq!(format!("{}", pose), "(x: 72.00, y: 36.50, θ: 0.00 rad)");
    }
}
