//! Forward kinematics of an X-configuration mecanum drive.
//!
//! Wheels are numbered front-left, front-right, back-left, back-right. The
//! linear model is exact only for idealized rollers and is most accurate when
//! the resulting direction lies within ±45° of the forward axis; see
//! [`crate::correction`] for the adjustment applied outside that band.

use core::fmt;
use libm::fabs;

use crate::matrix::Matrix;
use crate::{Displacement, KinematicsError};

/// Maps a vector of wheel turns onto a robot-frame displacement.
///
/// Implemented once per drivetrain kind so the integration loop does not care
/// which drivetrain it is stepping.
pub trait ForwardKinematics<const WHEELS: usize> {
    /// Solve the forward kinematics for one set of wheel angular displacements.
    fn solve(&self, wheel_turns: [f64; WHEELS]) -> Displacement;
}

/// Mecanum drive kinematics helper.
///
/// Owns the fixed 3×4 transform built from the drivetrain geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MecanumDrive {
    half_track: f64,
    half_wheelbase: f64,
    wheel_radius: f64,
    transform: Matrix<3, 4>,
}

impl MecanumDrive {
    /// Construct the kinematic model of a mecanum drive.
    ///
    /// # Arguments
    ///
    /// * `half_track`: Horizontal distance from the center to the wheels (`l1`).
    /// * `half_wheelbase`: Vertical distance from the center to the wheels (`l2`).
    /// * `wheel_radius`: Radius of the wheels (`r`), or any scale that converts
    ///   one wheel turn into linear distance.
    ///
    /// All three must share one linear unit.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three values is not a positive finite number.
    pub fn new(
        half_track: f64,
        half_wheelbase: f64,
        wheel_radius: f64,
    ) -> Result<Self, KinematicsError> {
        if !(half_track > 0.0 && half_track.is_finite()) {
            return Err(KinematicsError::InvalidHalfTrack("must be positive"));
        }
        if !(half_wheelbase > 0.0 && half_wheelbase.is_finite()) {
            return Err(KinematicsError::InvalidHalfWheelbase("must be positive"));
        }
        if !(wheel_radius > 0.0 && wheel_radius.is_finite()) {
            return Err(KinematicsError::InvalidWheelRadius("must be positive"));
        }

        let r = wheel_radius;
        let l = half_track + half_wheelbase;
        let transform = Matrix::new([
            [r / 4.0, r / 4.0, r / 4.0, r / 4.0],
            [r / 4.0, -r / 4.0, -r / 4.0, r / 4.0],
            [(-r / 4.0) / l, (r / 4.0) / l, (-r / 4.0) / l, (r / 4.0) / l],
        ]);

        Ok(MecanumDrive {
            half_track,
            half_wheelbase,
            wheel_radius,
            transform,
        })
    }

    /// Returns the half-track distance.
    pub fn half_track(&self) -> f64 {
        self.half_track
    }

    /// Returns the half-wheelbase distance.
    pub fn half_wheelbase(&self) -> f64 {
        self.half_wheelbase
    }

    /// Returns the wheel radius.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Returns the forward transform matrix.
    pub fn transform(&self) -> &Matrix<3, 4> {
        &self.transform
    }

    /// Mix a normalized chassis command into four wheel commands.
    ///
    /// `forward`, `strafe` and `turn` are fractions of full speed. The result
    /// is scaled down uniformly whenever a wheel would exceed magnitude 1, so
    /// the direction of travel is kept while saturating.
    pub fn mix(forward: f64, strafe: f64, turn: f64) -> [f64; 4] {
        let mut wheels = [
            forward + strafe - turn,
            forward - strafe + turn,
            forward - strafe - turn,
            forward + strafe + turn,
        ];
        let peak = wheels.iter().fold(0.0_f64, |acc, w| acc.max(fabs(*w)));
        if peak > 1.0 {
            for w in wheels.iter_mut() {
                *w /= peak;
            }
        }
        wheels
    }
}

impl ForwardKinematics<4> for MecanumDrive {
    fn solve(&self, wheel_turns: [f64; 4]) -> Displacement {
        let column = Matrix::row_vector(wheel_turns).transpose();
        let [dx, dy, dtheta] = self.transform.multiply(&column).transpose().row(0);
        Displacement::new(dx, dy, dtheta)
    }
}

impl fmt::Display for MecanumDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MecanumDrive (l1: {:.2}, l2: {:.2}, r: {:.2})",
            self.half_track, self.half_wheelbase, self.wheel_radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    fn drive() -> MecanumDrive {
        MecanumDrive::new(7.0, 8.0, 2.0).unwrap()
    }

    #[test]
    fn test_constructor() {
        let kinematics = drive();
        assert_eq!(kinematics.half_track(), 7.0);
        assert_eq!(kinematics.half_wheelbase(), 8.0);
        assert_eq!(kinematics.wheel_radius(), 2.0);
        assert_eq!(kinematics.transform().row(0), [0.5, 0.5, 0.5, 0.5]);
        assert_eq!(kinematics.transform().row(1), [0.5, -0.5, -0.5, 0.5]);
        assert!((kinematics.transform()[(2, 0)] - (-0.5 / 15.0)).abs() < EPSILON);
        assert!((kinematics.transform()[(2, 3)] - (0.5 / 15.0)).abs() < EPSILON);
    }

    #[test]
    fn test_constructor_rejects_degenerate_geometry() {
        assert!(matches!(
            MecanumDrive::new(0.0, 8.0, 2.0),
            Err(KinematicsError::InvalidHalfTrack(_))
        ));
        assert!(matches!(
            MecanumDrive::new(7.0, -1.0, 2.0),
            Err(KinematicsError::InvalidHalfWheelbase(_))
        ));
        assert!(matches!(
            MecanumDrive::new(7.0, 8.0, 0.0),
            Err(KinematicsError::InvalidWheelRadius(_))
        ));
        assert!(matches!(
            MecanumDrive::new(f64::NAN, 8.0, 2.0),
            Err(KinematicsError::InvalidHalfTrack(_))
        ));
    }

    #[test]
    fn test_all_forward_is_pure_translation() {
        let d = drive().solve([1.0, 1.0, 1.0, 1.0]);
        assert!((d.dx - 2.0).abs() < EPSILON);
        assert!(d.dy.abs() < EPSILON);
        assert!(d.dtheta.abs() < EPSILON);
    }

    #[test]
    fn test_alternating_is_rotation_in_place() {
        let d = drive().solve([1.0, -1.0, 1.0, -1.0]);
        assert!(d.dx.abs() < EPSILON);
        assert!(d.dy.abs() < EPSILON);
        assert!((d.dtheta - (-2.0 / 15.0)).abs() < EPSILON);
    }

    #[test]
    fn test_strafe_is_pure_lateral() {
        let d = drive().solve([1.0, -1.0, -1.0, 1.0]);
        assert!(d.dx.abs() < EPSILON);
        assert!((d.dy - 2.0).abs() < EPSILON);
        assert!(d.dtheta.abs() < EPSILON);
    }

    #[test]
    fn test_solve_is_linear() {
        let kinematics = drive();
        let w1 = [0.3, -0.7, 1.2, 0.05];
        let w2 = [-1.5, 0.4, 0.9, -0.2];
        let (a, b) = (2.5, -0.75);

        let mut combined = [0.0; 4];
        for i in 0..4 {
            combined[i] = a * w1[i] + b * w2[i];
        }
        let lhs = kinematics.solve(combined);
        let s1 = kinematics.solve(w1);
        let s2 = kinematics.solve(w2);

        assert!((lhs.dx - (a * s1.dx + b * s2.dx)).abs() < EPSILON);
        assert!((lhs.dy - (a * s1.dy + b * s2.dy)).abs() < EPSILON);
        assert!((lhs.dtheta - (a * s1.dtheta + b * s2.dtheta)).abs() < EPSILON);
    }

    #[test]
    fn test_zero_turns_give_zero_displacement() {
        assert_eq!(drive().solve([0.0; 4]), Displacement::default());
    }

    #[test]
    fn test_mix_matches_solver_axes() {
        let kinematics = drive();
        let forward = kinematics.solve(MecanumDrive::mix(1.0, 0.0, 0.0));
        assert!(forward.dx > 0.0 && forward.dy.abs() < EPSILON && forward.dtheta.abs() < EPSILON);

        let strafe = kinematics.solve(MecanumDrive::mix(0.0, 1.0, 0.0));
        assert!(strafe.dy > 0.0 && strafe.dx.abs() < EPSILON && strafe.dtheta.abs() < EPSILON);

        let turn = kinematics.solve(MecanumDrive::mix(0.0, 0.0, 1.0));
        assert!(turn.dtheta > 0.0 && turn.dx.abs() < EPSILON && turn.dy.abs() < EPSILON);
    }

    #[test]
    fn test_mix_desaturates() {
        let wheels = MecanumDrive::mix(1.0, 1.0, 1.0);
        assert!(wheels.iter().all(|w| w.abs() <= 1.0 + EPSILON));
        assert!((wheels[3] - 1.0).abs() < EPSILON);

        let gentle = MecanumDrive::mix(0.25, 0.0, 0.0);
        assert_eq!(gentle, [0.25; 4]);
    }
}
