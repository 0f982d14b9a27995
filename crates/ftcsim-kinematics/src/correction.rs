//! Diagonal speed correction for the linear mecanum model.
//!
//! The forward kinematics only predict speed accurately while the displacement
//! direction stays within `[-π/4, π/4]`. Strictly between 45° and 135° the raw
//! distance is inverted about the 45° diagonal bound and rescaled by `√2/2`.

use core::f64::consts::{FRAC_PI_4, SQRT_2};
use libm::fabs;

/// Corrects the distance produced by the mecanum forward kinematics.
///
/// # Arguments
///
/// * `raw_distance`: Planar distance `hypot(dx, dy)` from the solver (`>= 0`).
/// * `angle`: Direction of the displacement in radians, `atan2(dy, dx)`.
/// * `max_speed`: Largest distance the drivetrain can cover in this step (`> 0`).
///
/// # Returns
///
/// `raw_distance` unchanged when `|angle| <= π/4` or `|angle| >= 3π/4`,
/// otherwise the corrected distance. The arithmetic below is kept step by step;
/// rearranging it changes results right at the band edges.
pub fn correct_speed(raw_distance: f64, angle: f64, max_speed: f64) -> f64 {
    let angle = fabs(angle);
    if angle <= FRAC_PI_4 || angle >= 3.0 * FRAC_PI_4 {
        return raw_distance;
    }
    debug_assert!(max_speed > 0.0, "max_speed must be positive");

    // Max speed along 45 degrees.
    let max_diagonal = max_speed * (SQRT_2 / 2.0);
    let mut normalized = (raw_distance - max_diagonal) / (max_speed - max_diagonal);
    normalized *= SQRT_2 / 2.0;
    normalized *= -1.0;
    max_diagonal + normalized * (max_speed - max_diagonal)
}
