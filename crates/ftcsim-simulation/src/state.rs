//! State shared between the integration loop, the render sampler and whoever
//! is driving the wheels.
//!
//! Every scalar is its own [`AtomicF64`]. Readers may see `x`, `y` and `θ`
//! from different ticks; nothing here takes a lock.

use ftcsim_kinematics::Pose;

use crate::atomic::AtomicF64;
use crate::geometry::RobotFootprint;
use crate::wheel::WheelVisual;

/// Number of driven wheels.
pub const WHEEL_COUNT: usize = 4;

/// Wheel positions, in solver order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wheel {
    /// Front left wheel.
    FrontLeft,
    /// Front right wheel.
    FrontRight,
    /// Back left wheel.
    BackLeft,
    /// Back right wheel.
    BackRight,
}

impl Wheel {
    /// Every wheel, in solver order.
    pub const ALL: [Wheel; WHEEL_COUNT] = [
        Wheel::FrontLeft,
        Wheel::FrontRight,
        Wheel::BackLeft,
        Wheel::BackRight,
    ];

    /// Position in solver order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The wheel at solver position `index`.
    pub fn from_index(index: usize) -> Option<Wheel> {
        Wheel::ALL.get(index).copied()
    }
}

/// Robot pose, one atomic per field.
#[derive(Debug, Default)]
pub struct SharedPose {
    x: AtomicF64,
    y: AtomicF64,
    theta: AtomicF64,
}

impl SharedPose {
    /// Shared copy of `pose`.
    pub fn new(pose: Pose) -> Self {
        SharedPose {
            x: AtomicF64::new(pose.x),
            y: AtomicF64::new(pose.y),
            theta: AtomicF64::new(pose.theta),
        }
    }

    /// Reads each field independently.
    pub fn load(&self) -> Pose {
        Pose::new(self.x.load(), self.y.load(), self.theta.load())
    }

    /// Replace every field. Not atomic as a whole.
    pub fn store(&self, pose: Pose) {
        self.x.store(pose.x);
        self.y.store(pose.y);
        self.theta.store(pose.theta);
    }

    /// Current heading.
    pub fn theta(&self) -> f64 {
        self.theta.load()
    }

    /// Add a field-frame displacement.
    pub fn translate(&self, dx: f64, dy: f64, dtheta: f64) {
        self.x.fetch_add(dx);
        self.y.fetch_add(dy);
        self.theta.fetch_add(dtheta);
    }
}

/// Live wheel speed commands, each a signed fraction of full speed.
///
/// Values are stored as given; anything beyond `[-1, 1]` saturates when the
/// loop reads it.
#[derive(Debug, Default)]
pub struct WheelCommands {
    speeds: [AtomicF64; WHEEL_COUNT],
}

impl WheelCommands {
    /// All wheels stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Command of one wheel.
    pub fn get(&self, wheel: Wheel) -> f64 {
        self.speeds[wheel.index()].load()
    }

    /// Set one wheel's command.
    pub fn set(&self, wheel: Wheel, speed: f64) {
        self.speeds[wheel.index()].store(speed);
    }

    /// Set every wheel at once, in solver order.
    pub fn set_all(&self, speeds: [f64; WHEEL_COUNT]) {
        for (slot, speed) in self.speeds.iter().zip(speeds) {
            slot.store(speed);
        }
    }

    /// Current commands, read one wheel at a time.
    pub fn snapshot(&self) -> [f64; WHEEL_COUNT] {
        std::array::from_fn(|i| self.speeds[i].load())
    }

    /// Stop every wheel.
    pub fn zero(&self) {
        self.set_all([0.0; WHEEL_COUNT]);
    }
}

/// Everything one robot's loops share.
#[derive(Debug)]
pub struct SimState {
    /// Robot pose, in field pixels.
    pub pose: SharedPose,
    /// Wheel commands, normally in `[-1, 1]`.
    pub commands: WheelCommands,
    /// Roller animation of each wheel.
    pub wheels: [WheelVisual; WHEEL_COUNT],
}

impl SimState {
    /// State for a robot at `pose` drawn as `footprint`.
    pub fn new(pose: Pose, footprint: &RobotFootprint) -> Self {
        let (length, width) = footprint.wheel_size;
        SimState {
            pose: SharedPose::new(pose),
            commands: WheelCommands::new(),
            wheels: std::array::from_fn(|i| {
                WheelVisual::new(footprint.wheels[i].hand, length, width)
            }),
        }
    }

    /// Roller scroll position of each wheel.
    pub fn wheel_rolls(&self) -> [f64; WHEEL_COUNT] {
        std::array::from_fn(|i| self.wheels[i].roll_position())
    }
}
