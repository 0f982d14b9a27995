//! Render sampler: reads the pose at display cadence and publishes where the
//! robot should be drawn.
//!
//! Sampling only reads shared state. It never writes back, so it can run at
//! any rate without disturbing the integration loop.

use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Duration;

use ftcsim_kinematics::Pose;
use spin_sleep::SpinSleeper;
use tracing::trace;

use crate::bus::Topic;
use crate::geometry::RobotFootprint;
use crate::lifecycle::StopToken;
use crate::state::{SimState, WHEEL_COUNT};

/// Placement of a robot's drawing pane on screen.
///
/// `rotation_deg` is clockwise in y-down screen space, applied about the pane
/// center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    /// Screen x of the pane's top-left corner before rotation.
    pub layout_x: f64,
    /// Screen y of the pane's top-left corner before rotation.
    pub layout_y: f64,
    /// Clockwise rotation about the pane center, in degrees.
    pub rotation_deg: f64,
    pivot: (f64, f64),
}

impl ScreenTransform {
    /// Placement of a robot at `pose`.
    pub fn from_pose(pose: &Pose, footprint: &RobotFootprint) -> Self {
        let pivot = footprint.center();
        ScreenTransform {
            layout_x: pose.x - pivot.0,
            layout_y: pose.y - pivot.1,
            rotation_deg: (PI - (pose.theta + PI / 2.0)).to_degrees(),
            pivot,
        }
    }

    /// Map a pane-local point to screen coordinates.
    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
        let (px, py) = (x - self.pivot.0, y - self.pivot.1);
        (
            self.layout_x + self.pivot.0 + px * cos - py * sin,
            self.layout_y + self.pivot.1 + px * sin + py * cos,
        )
    }
}

/// One sampled frame for one robot.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Name of the robot this frame shows.
    pub robot: Arc<str>,
    /// Pose at sampling time.
    pub pose: Pose,
    /// Where to draw the robot's pane.
    pub transform: ScreenTransform,
    /// Roller scroll position of each wheel.
    pub wheel_rolls: [f64; WHEEL_COUNT],
}

/// Periodically samples one robot's state onto a frame topic.
#[derive(Debug)]
pub struct RenderSampler {
    robot: Arc<str>,
    footprint: RobotFootprint,
    state: Arc<SimState>,
    frames: Topic<RenderFrame>,
    frame_period: Duration,
}

impl RenderSampler {
    /// A sampler for one robot, publishing every `frame_period`.
    pub fn new(
        robot: Arc<str>,
        footprint: RobotFootprint,
        state: Arc<SimState>,
        frames: Topic<RenderFrame>,
        frame_period: Duration,
    ) -> Self {
        RenderSampler {
            robot,
            footprint,
            state,
            frames,
            frame_period,
        }
    }

    /// Read the current state into a frame.
    pub fn sample(&self) -> RenderFrame {
        let pose = self.state.pose.load();
        RenderFrame {
            robot: Arc::clone(&self.robot),
            pose,
            transform: ScreenTransform::from_pose(&pose, &self.footprint),
            wheel_rolls: self.state.wheel_rolls(),
        }
    }

    /// Sample once and publish the frame.
    pub fn publish(&self) {
        let receivers = self.frames.publish(self.sample());
        trace!(robot = %self.robot, receivers, "Frame published.");
    }

    /// Publish a frame every `frame_period` until `token` is stopped.
    pub fn run(&self, token: &StopToken) {
        let sleeper = SpinSleeper::new(100_000);
        while !token.is_stopped() {
            self.publish();
            sleeper.sleep(self.frame_period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DriveGeometry;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-9;

    fn footprint() -> RobotFootprint {
        DriveGeometry::new(7.0, 8.0, 4.0, 90.0).unwrap().footprint()
    }

    #[test]
    fn test_transform_from_pose() {
        let f = footprint();
        let t = ScreenTransform::from_pose(&Pose::new(100.0, 200.0, 0.0), &f);
        assert!((t.layout_x - 92.0).abs() < EPSILON);
        assert!((t.layout_y - 191.0).abs() < EPSILON);
        assert!((t.rotation_deg - 90.0).abs() < EPSILON);

        let turned = ScreenTransform::from_pose(&Pose::new(0.0, 0.0, FRAC_PI_2), &f);
        assert!(turned.rotation_deg.abs() < EPSILON);
    }

    #[test]
    fn test_apply_keeps_pivot_at_pose() {
        let f = footprint();
        let pose = Pose::new(320.0, 240.0, 1.234);
        let t = ScreenTransform::from_pose(&pose, &f);
        let (x, y) = t.apply(f.center());
        assert!((x - pose.x).abs() < EPSILON);
        assert!((y - pose.y).abs() < EPSILON);
    }

    #[test]
    fn test_apply_rotates_clockwise() {
        let f = footprint();
        // θ = 0 draws the pane rotated 90° clockwise, so the front marker
        // (top-center of the body) ends up to the right of the center.
        let t = ScreenTransform::from_pose(&Pose::new(0.0, 0.0, 0.0), &f);
        let (x, y) = t.apply(f.marker);
        assert!(x > 0.0);
        assert!(y.abs() < EPSILON);
    }

    #[test]
    fn test_sample_reads_shared_state() {
        let f = footprint();
        let state = Arc::new(SimState::new(Pose::new(10.0, 20.0, 0.5), &f));
        let topic = Topic::new(4);
        let mut rx = topic.subscribe();
        let sampler = RenderSampler::new(
            Arc::from("blue"),
            f,
            Arc::clone(&state),
            topic,
            Duration::from_millis(16),
        );

        state.wheels[2].advance(0.1);
        sampler.publish();

        let frame = rx.try_recv().unwrap();
        assert_eq!(&*frame.robot, "blue");
        assert_eq!(frame.pose, Pose::new(10.0, 20.0, 0.5));
        assert_eq!(frame.wheel_rolls[2], state.wheels[2].roll_position());
        assert_eq!(frame.transform, ScreenTransform::from_pose(&frame.pose, &f));
    }
}
