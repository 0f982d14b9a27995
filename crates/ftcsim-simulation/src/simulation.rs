//! Simulation lifecycle: start, stop and reset of a robot's two loops.

use std::sync::Arc;
use std::time::Duration;

use ftcsim_kinematics::{FieldCalibration, MecanumDrive, Pose, Unit};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::bus::Topic;
use crate::color::RobotColor;
use crate::error::SimulationError;
use crate::geometry::{DriveGeometry, RobotFootprint, RobotParams};
use crate::integrator::Integrator;
use crate::lifecycle::Worker;
use crate::render::{RenderFrame, RenderSampler};
use crate::state::{SimState, WheelCommands};

/// Something that can be started, stopped and reset.
///
/// Implemented once per drivetrain kind; the registry only sees this trait.
pub trait Simulation: Send + Sync {
    /// Name given at construction.
    fn name(&self) -> &str;

    /// Begin integrating and sampling. A no-op while already running.
    fn start(&self) -> Result<(), SimulationError>;

    /// Halt both loops. Once this returns, the pose no longer changes.
    fn stop(&self);

    /// Stop, then restore the start pose and zero every wheel command.
    fn reset(&self);

    /// Whether the loops are running.
    fn is_running(&self) -> bool;

    /// Current pose, in field pixels.
    fn pose(&self) -> Pose;

    /// Live wheel commands, writable while running.
    fn commands(&self) -> &WheelCommands;
}

/// Pacing of the two loops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationOptions {
    /// Pause between integration ticks. Zero runs the loop flat out.
    pub tick_period: Duration,
    /// Render sampler rate in Hz.
    pub frame_rate: f64,
}

impl SimulationOptions {
    /// Reject a frame rate that is not positive and finite.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.frame_rate > 0.0 && self.frame_rate.is_finite()) {
            return Err(SimulationError::InvalidOptions("frame rate must be positive"));
        }
        Ok(())
    }

    /// Time between render samples.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate)
    }
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions {
            tick_period: Duration::ZERO,
            frame_rate: 60.0,
        }
    }
}

#[derive(Debug)]
struct Running {
    integrator: Worker<u64>,
    sampler: Worker,
}

/// A simulated mecanum-drive robot.
#[derive(Debug)]
pub struct MecanumSimulation {
    name: Arc<str>,
    geometry: DriveGeometry,
    footprint: RobotFootprint,
    units: Unit,
    color: RobotColor,
    reset_pose: Pose,
    options: SimulationOptions,
    state: Arc<SimState>,
    integrator: Arc<Integrator<MecanumDrive>>,
    sampler: Arc<RenderSampler>,
    running: Mutex<Option<Running>>,
}

impl MecanumSimulation {
    /// Build a robot from its parameters. Nothing runs until [`Simulation::start`].
    ///
    /// Frames are published on `frames`; one is published right away so the
    /// robot shows up at its start pose.
    ///
    /// # Errors
    ///
    /// Returns an error for degenerate geometry or options.
    pub fn new(
        params: &RobotParams,
        calibration: &FieldCalibration,
        options: SimulationOptions,
        frames: Topic<RenderFrame>,
    ) -> Result<Self, SimulationError> {
        options.validate()?;
        let geometry = DriveGeometry::from_params(params, calibration)?;
        let footprint = geometry.footprint();
        let reset_pose = params.start_pose(calibration);
        let name: Arc<str> = Arc::from(params.name.as_str());

        let state = Arc::new(SimState::new(reset_pose, &footprint));
        let integrator = Arc::new(Integrator::new(
            geometry.solver()?,
            geometry.max_linear_speed(),
            Arc::clone(&state),
        ));
        let sampler = Arc::new(RenderSampler::new(
            Arc::clone(&name),
            footprint,
            Arc::clone(&state),
            frames,
            options.frame_period(),
        ));
        sampler.publish();

        info!(
            robot = %name,
            start = %reset_pose,
            max_speed_px_s = geometry.max_linear_speed(),
            "Simulation created."
        );

        Ok(MecanumSimulation {
            name,
            geometry,
            footprint,
            units: params.units,
            color: params.color,
            reset_pose,
            options,
            state,
            integrator,
            sampler,
            running: Mutex::new(None),
        })
    }

    /// Pixel geometry the robot was built with.
    pub fn geometry(&self) -> &DriveGeometry {
        &self.geometry
    }

    /// Drawn layout of the robot.
    pub fn footprint(&self) -> &RobotFootprint {
        &self.footprint
    }

    /// Unit the robot was configured in.
    pub fn units(&self) -> Unit {
        self.units
    }

    /// Body color.
    pub fn color(&self) -> RobotColor {
        self.color
    }

    /// Pose that [`Simulation::reset`] restores.
    pub fn reset_pose(&self) -> Pose {
        self.reset_pose
    }

    /// Shared state read by both loops.
    pub fn state(&self) -> &Arc<SimState> {
        &self.state
    }

    /// Stop both workers while the caller holds the lifecycle lock, so no
    /// start can slip in before the old threads are joined.
    fn halt(&self, running: &mut Option<Running>) {
        let Some(Running {
            integrator,
            sampler,
        }) = running.take()
        else {
            return;
        };
        integrator.signal();
        sampler.signal();
        let ticks = integrator.stop();
        sampler.stop();
        info!(
            robot = %self.name,
            pose = %self.state.pose.load(),
            ticks,
            "Simulation stopped."
        );
    }

    /// Sample the current state without going through the topic.
    pub fn sample(&self) -> RenderFrame {
        self.sampler.sample()
    }
}

impl Simulation for MecanumSimulation {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self) -> Result<(), SimulationError> {
        let mut running = self.running.lock();
        if running.is_some() {
            warn!(robot = %self.name, "Simulation already running.");
            return Ok(());
        }

        // The integrator goes last so nothing else delays a following stop.
        let sampler = Worker::spawn(format!("{}-sampler", self.name), {
            let sampler = Arc::clone(&self.sampler);
            move |token| sampler.run(&token)
        })?;
        let integrator = match Worker::spawn(format!("{}-integrator", self.name), {
            let integrator = Arc::clone(&self.integrator);
            let tick_period = self.options.tick_period;
            move |token| integrator.run(&token, tick_period)
        }) {
            Ok(integrator) => integrator,
            Err(e) => {
                sampler.stop();
                return Err(e);
            }
        };

        *running = Some(Running {
            integrator,
            sampler,
        });
        info!(robot = %self.name, "Simulation started.");
        Ok(())
    }

    fn stop(&self) {
        let mut running = self.running.lock();
        self.halt(&mut running);
    }

    fn reset(&self) {
        let mut running = self.running.lock();
        self.halt(&mut running);
        self.state.pose.store(self.reset_pose);
        self.state.commands.zero();
        self.sampler.publish();
        info!(robot = %self.name, pose = %self.reset_pose, "Simulation reset.");
    }

    fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    fn pose(&self) -> Pose {
        self.state.pose.load()
    }

    fn commands(&self) -> &WheelCommands {
        &self.state.commands
    }
}

impl Drop for MecanumSimulation {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Wheel;
    use std::thread;

    fn params() -> RobotParams {
        RobotParams {
            name: "blue".into(),
            start_x: 72.0,
            start_y: 72.0,
            start_theta: 0.0,
            half_track: 7.0,
            half_wheelbase: 8.0,
            wheel_diameter: 4.0,
            max_rpm: 90.0,
            units: Unit::Inches,
            color: RobotColor::Blue,
        }
    }

    fn simulation() -> MecanumSimulation {
        MecanumSimulation::new(
            &params(),
            &FieldCalibration::default(),
            SimulationOptions::default(),
            Topic::new(16),
        )
        .unwrap()
    }

    #[test]
    fn test_new_places_robot_at_start() {
        let sim = simulation();
        let expected = Pose::new(72.0 * 800.0 / 141.0, 72.0 * 800.0 / 141.0, 0.0);
        assert_eq!(sim.pose(), expected);
        assert_eq!(sim.reset_pose(), expected);
        assert!(!sim.is_running());
        assert_eq!(sim.name(), "blue");
    }

    #[test]
    fn test_new_rejects_bad_input() {
        let mut bad = params();
        bad.half_track = 0.0;
        let err = MecanumSimulation::new(
            &bad,
            &FieldCalibration::default(),
            SimulationOptions::default(),
            Topic::new(1),
        );
        assert!(matches!(err, Err(SimulationError::InvalidGeometry(_))));

        let options = SimulationOptions {
            frame_rate: 0.0,
            ..Default::default()
        };
        let err = MecanumSimulation::new(&params(), &FieldCalibration::default(), options, Topic::new(1));
        assert!(matches!(err, Err(SimulationError::InvalidOptions(_))));
    }

    #[test]
    fn test_start_moves_robot_and_stop_freezes_it() {
        let sim = simulation();
        sim.commands().set_all([1.0; 4]);
        sim.start().unwrap();
        assert!(sim.is_running());
        thread::sleep(Duration::from_millis(50));
        sim.stop();
        assert!(!sim.is_running());

        let stopped = sim.pose();
        assert!(stopped.x > sim.reset_pose().x);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(sim.pose(), stopped);
    }

    #[test]
    fn test_start_then_stop_never_moves() {
        let sim = simulation();
        // Time spent idle before start must not be integrated.
        thread::sleep(Duration::from_millis(20));

        for _ in 0..500 {
            sim.reset();
            sim.commands().set_all([1.0; 4]);
            sim.start().unwrap();
            sim.stop();
            assert_eq!(sim.pose(), sim.reset_pose());
        }
    }

    #[test]
    fn test_reset_while_running_leaves_no_writer() {
        let sim = simulation();
        sim.commands().set_all([1.0; 4]);
        sim.start().unwrap();
        thread::sleep(Duration::from_millis(10));
        sim.reset();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(sim.pose(), sim.reset_pose());
    }

    #[test]
    fn test_zero_commands_keep_pose() {
        let sim = simulation();
        sim.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        sim.stop();
        assert_eq!(sim.pose(), sim.reset_pose());
    }

    #[test]
    fn test_reset_restores_start_and_zeroes_commands() {
        let sim = simulation();
        sim.commands().set_all([0.8, -0.3, 1.0, 0.6]);
        sim.start().unwrap();
        thread::sleep(Duration::from_millis(30));
        sim.reset();

        assert!(!sim.is_running());
        assert_eq!(sim.pose(), sim.reset_pose());
        assert_eq!(sim.commands().snapshot(), [0.0; 4]);

        // Reset does not restart; a fresh start works again.
        thread::sleep(Duration::from_millis(10));
        assert_eq!(sim.pose(), sim.reset_pose());
        sim.commands().set(Wheel::FrontLeft, 1.0);
        sim.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        sim.stop();
        assert_ne!(sim.pose(), sim.reset_pose());
    }

    #[test]
    fn test_double_start_is_harmless() {
        let sim = simulation();
        sim.start().unwrap();
        sim.start().unwrap();
        assert!(sim.is_running());
        sim.stop();
        sim.stop();
        assert!(!sim.is_running());
    }

    #[test]
    fn test_frames_published_while_running() {
        let topic = Topic::new(64);
        let mut rx = topic.subscribe();
        let sim = MecanumSimulation::new(
            &params(),
            &FieldCalibration::default(),
            SimulationOptions {
                frame_rate: 200.0,
                ..Default::default()
            },
            topic,
        )
        .unwrap();

        // Construction publishes the start frame.
        let first = rx.try_recv().unwrap();
        assert_eq!(first.pose, sim.reset_pose());

        sim.start().unwrap();
        thread::sleep(Duration::from_millis(50));
        sim.stop();

        let mut frames = 0;
        while rx.try_recv().is_ok() {
            frames += 1;
        }
        assert!(frames > 1);
    }
}
