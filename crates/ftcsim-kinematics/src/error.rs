#![warn(missing_docs)]

//! Error types for the kinematics library.
//!
//! These are only ever produced while building a drivetrain model or a field
//! calibration. Solving and correcting are total and never fail.

use core::fmt;

/// Errors that can occur while constructing kinematic models.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Error for invalid half-track distance.
    /// Returned when the center-to-wheel distance across the robot is not positive.
    InvalidHalfTrack(&'static str),
    /// Error for invalid half-wheelbase distance.
    /// Returned when the center-to-wheel distance along the robot is not positive.
    InvalidHalfWheelbase(&'static str),
    /// Error for invalid wheel radius.
    /// Returned when a wheel radius is provided that is not positive.
    InvalidWheelRadius(&'static str),
    /// Error for invalid on-screen field length.
    /// Returned when the field calibration length is not positive.
    InvalidFieldLength(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidHalfTrack(msg) => write!(f, "Invalid half-track: {}", msg),
            KinematicsError::InvalidHalfWheelbase(msg) => {
                write!(f, "Invalid half-wheelbase: {}", msg)
            }
            KinematicsError::InvalidWheelRadius(msg) => write!(f, "Invalid wheel radius: {}", msg),
            KinematicsError::InvalidFieldLength(msg) => write!(f, "Invalid field length: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
