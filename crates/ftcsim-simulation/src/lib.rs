//! Real-time simulation of mecanum-drive robots.
//!
//! Each robot runs two threads: an integration loop that turns wheel commands
//! into pose updates as fast as the host allows, and a render sampler that
//! publishes where to draw the robot at display rate. They share state through
//! atomics only.

#![warn(missing_docs)]

/// Lock-free `f64` cells.
pub mod atomic;
/// Broadcast topic for render frames.
pub mod bus;
/// Robot display colors.
pub mod color;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod lifecycle;
/// Registry of every simulation built by the application.
pub mod registry;
pub mod render;
pub mod simulation;
pub mod state;
pub mod wheel;

pub use bus::Topic;
pub use color::RobotColor;
pub use error::SimulationError;
pub use geometry::{DriveGeometry, RobotFootprint, RobotParams};
pub use registry::SimulationRegistry;
pub use render::{RenderFrame, RenderSampler, ScreenTransform};
pub use simulation::{MecanumSimulation, Simulation, SimulationOptions};
pub use state::{SimState, Wheel, WheelCommands};

pub use ftcsim_kinematics as kinematics;
