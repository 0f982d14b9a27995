//! Robot construction parameters and the drivetrain geometry derived from them.
//!
//! Everything is converted to field pixels once, at construction. The loops
//! never see any other unit.

use std::f64::consts::PI;

use ftcsim_kinematics::{FieldCalibration, MecanumDrive, Pose, Unit};
use serde::{Deserialize, Serialize};

use crate::color::RobotColor;
use crate::error::SimulationError;
use crate::wheel::WheelHand;

/// Construction parameters for one robot, in the robot's own unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotParams {
    /// Label shown in the window; also keys the robot's frames.
    #[serde(default = "default_robot_name")]
    pub name: String,
    /// Start position, in `units`.
    pub start_x: f64,
    /// Start position, in `units`.
    pub start_y: f64,
    /// Starting heading in radians.
    #[serde(default)]
    pub start_theta: f64,
    /// Horizontal distance from the center to the wheels.
    pub half_track: f64,
    /// Vertical distance from the center to the wheels.
    pub half_wheelbase: f64,
    /// Wheel diameter, in `units`.
    pub wheel_diameter: f64,
    /// Wheel speed at full command.
    pub max_rpm: f64,
    /// Unit of every length above.
    #[serde(default)]
    pub units: Unit,
    /// Body color.
    #[serde(default)]
    pub color: RobotColor,
}

fn default_robot_name() -> String {
    "robot".to_string()
}

impl RobotParams {
    /// Start pose converted to pixels. Heading is unit-free.
    pub fn start_pose(&self, calibration: &FieldCalibration) -> Pose {
        Pose::new(
            calibration.to_pixels(self.start_x, self.units),
            calibration.to_pixels(self.start_y, self.units),
            self.start_theta,
        )
    }
}

/// Drivetrain dimensions in pixels, plus the wheel surface speed limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveGeometry {
    half_track: f64,
    half_wheelbase: f64,
    wheel_radius: f64,
    max_linear_speed: f64,
}

impl DriveGeometry {
    /// Build geometry from pixel dimensions.
    ///
    /// `max_linear_speed` is the wheel surface speed at `max_rpm`,
    /// `π · diameter · rpm / 60`, in pixels per second.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::InvalidGeometry` if any dimension or the
    /// resulting speed is not a positive finite number.
    pub fn new(
        half_track: f64,
        half_wheelbase: f64,
        wheel_diameter: f64,
        max_rpm: f64,
    ) -> Result<Self, SimulationError> {
        if !is_positive(half_track) {
            return Err(SimulationError::InvalidGeometry("half-track must be positive"));
        }
        if !is_positive(half_wheelbase) {
            return Err(SimulationError::InvalidGeometry(
                "half-wheelbase must be positive",
            ));
        }
        if !is_positive(wheel_diameter) {
            return Err(SimulationError::InvalidGeometry(
                "wheel diameter must be positive",
            ));
        }
        if !is_positive(max_rpm) {
            return Err(SimulationError::InvalidGeometry("max rpm must be positive"));
        }

        let max_linear_speed = PI * wheel_diameter * max_rpm / 60.0;
        // The speed correction divides by the gap between the axis and diagonal limits.
        let diagonal_gap = max_linear_speed - max_linear_speed * (2.0_f64.sqrt() / 2.0);
        if !is_positive(max_linear_speed) || !is_positive(diagonal_gap) {
            return Err(SimulationError::InvalidGeometry(
                "max linear speed must be positive",
            ));
        }

        Ok(DriveGeometry {
            half_track,
            half_wheelbase,
            wheel_radius: wheel_diameter / 2.0,
            max_linear_speed,
        })
    }

    /// Convert `params` to pixels and build geometry from them.
    pub fn from_params(
        params: &RobotParams,
        calibration: &FieldCalibration,
    ) -> Result<Self, SimulationError> {
        let px = |v: f64| calibration.to_pixels(v, params.units);
        DriveGeometry::new(
            px(params.half_track),
            px(params.half_wheelbase),
            px(params.wheel_diameter),
            params.max_rpm,
        )
    }

    /// Half the distance between left and right wheels, in pixels.
    pub fn half_track(&self) -> f64 {
        self.half_track
    }

    /// Half the distance between front and back axles, in pixels.
    pub fn half_wheelbase(&self) -> f64 {
        self.half_wheelbase
    }

    /// Wheel radius, in pixels.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Ground speed at full command, in pixels per second.
    pub fn max_linear_speed(&self) -> f64 {
        self.max_linear_speed
    }

    /// Kinematics model for this drivetrain.
    ///
    /// Wheel turns fed to the loop are fractions of full speed times seconds,
    /// so the solver is scaled by the surface speed rather than the radius:
    /// one full-speed second of all four wheels moves `max_linear_speed` pixels.
    pub fn solver(&self) -> Result<MecanumDrive, SimulationError> {
        Ok(MecanumDrive::new(
            self.half_track,
            self.half_wheelbase,
            self.max_linear_speed,
        )?)
    }

    /// Render dimensions for this drivetrain.
    pub fn footprint(&self) -> RobotFootprint {
        RobotFootprint::new(self)
    }
}

fn is_positive(v: f64) -> bool {
    v > 0.0 && v.is_finite()
}

/// Placement of one wheel within the robot's drawing pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelPlacement {
    /// Stripe direction of the wheel's rollers.
    pub hand: WheelHand,
    /// Top-left corner, pane-local.
    pub origin: (f64, f64),
}

/// Static drawing dimensions of a robot, pane-local with y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotFootprint {
    /// Size of the robot's drawing pane.
    pub pane_size: (f64, f64),
    /// Top-left corner of the body.
    pub body_origin: (f64, f64),
    /// Body width and height.
    pub body_size: (f64, f64),
    /// Wheel size as `(length, width)`.
    pub wheel_size: (f64, f64),
    /// Placement of each wheel, in solver order.
    pub wheels: [WheelPlacement; 4],
    /// Front marker center, pane-local.
    pub marker: (f64, f64),
}

impl RobotFootprint {
    fn new(geometry: &DriveGeometry) -> Self {
        let l1 = geometry.half_track;
        let l2 = geometry.half_wheelbase;
        let r = geometry.wheel_radius;
        let body_origin = (r / 2.0, r / 2.0);
        RobotFootprint {
            pane_size: (2.0 * l1 + r, 2.0 * l2 + r),
            body_origin,
            body_size: (2.0 * l1, 2.0 * l2),
            wheel_size: (r, 2.0 * r),
            wheels: [
                WheelPlacement {
                    hand: WheelHand::Right,
                    origin: (0.0, 0.0),
                },
                WheelPlacement {
                    hand: WheelHand::Left,
                    origin: (2.0 * l1, 0.0),
                },
                WheelPlacement {
                    hand: WheelHand::Left,
                    origin: (0.0, 2.0 * l2 - r),
                },
                WheelPlacement {
                    hand: WheelHand::Right,
                    origin: (2.0 * l1, 2.0 * l2 - r),
                },
            ],
            marker: (body_origin.0 + l1, body_origin.1),
        }
    }

    /// Pane center, the pivot the robot is drawn around.
    pub fn center(&self) -> (f64, f64) {
        (self.pane_size.0 / 2.0, self.pane_size.1 / 2.0)
    }
}
