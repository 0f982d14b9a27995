//! Field units and their conversion to on-screen pixels.
//!
//! Every ratio is derived from the size of one field edge expressed in each
//! unit. Pixels are calibrated by how long that edge is drawn on screen.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::KinematicsError;

/// Field edge length in inches.
pub const FIELD_SIZE_INCHES: f64 = 141.0;
/// Field edge length in feet.
pub const FIELD_SIZE_FEET: f64 = 11.75;
/// Field edge length in meters.
pub const FIELD_SIZE_METERS: f64 = 3.5814;
/// Field edge length in millimeters.
pub const FIELD_SIZE_MILLIMETERS: f64 = 3581.4;
/// Default on-screen field edge length in pixels.
pub const DEFAULT_FIELD_LENGTH_PX: f64 = 800.0;

/// A linear unit of measure accepted for robot geometry and positions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    /// Inches.
    #[default]
    Inches,
    /// Feet.
    Feet,
    /// Meters.
    Meters,
    /// Millimeters.
    Millimeters,
    /// Screen pixels, relative to the field calibration.
    Pixels,
}

impl Unit {
    /// All supported units.
    pub const ALL: [Unit; 5] = [
        Unit::Inches,
        Unit::Feet,
        Unit::Meters,
        Unit::Millimeters,
        Unit::Pixels,
    ];

    /// Short symbol used when printing values.
    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Inches => "in",
            Unit::Feet => "ft",
            Unit::Meters => "m",
            Unit::Millimeters => "mm",
            Unit::Pixels => "px",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Calibration of the on-screen field against its real size.
///
/// Serialized as the bare pixel length; deserializing goes through
/// [`FieldCalibration::new`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCalibration {
    field_length_px: f64,
}

impl TryFrom<f64> for FieldCalibration {
    type Error = KinematicsError;

    fn try_from(field_length_px: f64) -> Result<Self, Self::Error> {
        FieldCalibration::new(field_length_px)
    }
}

impl From<FieldCalibration> for f64 {
    fn from(calibration: FieldCalibration) -> f64 {
        calibration.field_length_px
    }
}

impl FieldCalibration {
    /// Calibrate against a field edge drawn `field_length_px` pixels long.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidFieldLength)` unless the length is a
    /// positive finite number.
    pub fn new(field_length_px: f64) -> Result<Self, KinematicsError> {
        if !(field_length_px > 0.0 && field_length_px.is_finite()) {
            return Err(KinematicsError::InvalidFieldLength("must be positive"));
        }
        Ok(FieldCalibration { field_length_px })
    }

    /// Returns the on-screen field edge length in pixels.
    pub fn field_length_px(&self) -> f64 {
        self.field_length_px
    }

    /// Length of one field edge expressed in `unit`.
    pub fn field_size(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Inches => FIELD_SIZE_INCHES,
            Unit::Feet => FIELD_SIZE_FEET,
            Unit::Meters => FIELD_SIZE_METERS,
            Unit::Millimeters => FIELD_SIZE_MILLIMETERS,
            Unit::Pixels => self.field_length_px,
        }
    }

    /// Convert `value` from one unit to another.
    pub fn convert(&self, value: f64, from: Unit, to: Unit) -> f64 {
        if from == to {
            return value;
        }
        value * (self.field_size(to) / self.field_size(from))
    }

    /// `value` in `unit` → pixels.
    pub fn to_pixels(&self, value: f64, unit: Unit) -> f64 {
        self.convert(value, unit, Unit::Pixels)
    }

    /// `value` in `unit` → inches.
    pub fn to_inches(&self, value: f64, unit: Unit) -> f64 {
        self.convert(value, unit, Unit::Inches)
    }

    /// `value` in `unit` → feet.
    pub fn to_feet(&self, value: f64, unit: Unit) -> f64 {
        self.convert(value, unit, Unit::Feet)
    }

    /// `value` in `unit` → meters.
    pub fn to_meters(&self, value: f64, unit: Unit) -> f64 {
        self.convert(value, unit, Unit::Meters)
    }

    /// `value` in `unit` → millimeters.
    pub fn to_millimeters(&self, value: f64, unit: Unit) -> f64 {
        self.convert(value, unit, Unit::Millimeters)
    }
}

impl Default for FieldCalibration {
    fn default() -> Self {
        FieldCalibration {
            field_length_px: DEFAULT_FIELD_LENGTH_PX,
        }
    }
}
