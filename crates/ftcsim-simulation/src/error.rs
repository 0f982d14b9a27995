//! Error types for building and driving simulations.

use ftcsim_kinematics::KinematicsError;

/// Errors raised while constructing or starting a simulation.
///
/// Ticking and sampling never fail; everything here is a configuration or
/// resource problem caught before the loops run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Drivetrain geometry that would make the kinematics degenerate.
    #[error("invalid drive geometry: {0}")]
    InvalidGeometry(&'static str),
    /// Loop pacing options that cannot be honored.
    #[error("invalid simulation options: {0}")]
    InvalidOptions(&'static str),
    /// Rejected by the kinematics model.
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn {name} thread")]
    Spawn {
        /// Name of the thread that failed to start.
        name: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },
}
