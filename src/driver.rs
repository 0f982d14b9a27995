use ftcsim_kinematics::MecanumDrive;
use ftcsim_simulation::{Wheel, WheelCommands};
use tracing::debug;

/// Step applied by a single wheel nudge.
pub const NUDGE_STEP: f64 = 0.1;

/// Chassis command from the held drive keys, each axis in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveAxes {
    pub forward: f64,
    pub strafe: f64,
    pub turn: f64,
}

impl DriveAxes {
    /// `strafe` is positive towards the robot's right, `turn` positive counter-clockwise.
    pub fn from_keys(
        forward: bool,
        back: bool,
        left: bool,
        right: bool,
        turn_left: bool,
        turn_right: bool,
    ) -> Self {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f64;
        DriveAxes {
            forward: axis(forward, back),
            strafe: axis(right, left),
            turn: axis(turn_left, turn_right),
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == DriveAxes::default()
    }

    pub fn wheel_commands(&self) -> [f64; 4] {
        MecanumDrive::mix(self.forward, self.strafe, self.turn)
    }
}

/// Turns keyboard state into wheel commands for the selected robot.
///
/// Chassis keys only write when the held combination changes, so wheel
/// nudges survive until the next chassis key press or release.
#[derive(Debug, Default)]
pub struct KeyboardDriver {
    selected_robot: usize,
    selected_wheel: Option<Wheel>,
    last_axes: DriveAxes,
}

impl KeyboardDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_robot(&self) -> usize {
        self.selected_robot
    }

    pub fn selected_wheel(&self) -> Option<Wheel> {
        self.selected_wheel
    }

    /// Move the selection to the next of `count` robots.
    pub fn cycle_robot(&mut self, count: usize) {
        if count > 0 {
            self.selected_robot = (self.selected_robot + 1) % count;
            self.last_axes = DriveAxes::default();
        }
    }

    pub fn select_wheel(&mut self, wheel: Wheel) {
        self.selected_wheel = Some(wheel);
    }

    /// Returns whether the commands were rewritten.
    pub fn apply_axes(&mut self, axes: DriveAxes, commands: &WheelCommands) -> bool {
        if axes == self.last_axes {
            return false;
        }
        self.last_axes = axes;
        let speeds = axes.wheel_commands();
        debug!(?axes, ?speeds, "Drive keys changed.");
        commands.set_all(speeds);
        true
    }

    /// Adjust the selected wheel by `steps` nudges, clamped to `[-1, 1]`.
    pub fn nudge(&self, steps: i32, commands: &WheelCommands) {
        if let Some(wheel) = self.selected_wheel {
            let speed = (commands.get(wheel) + steps as f64 * NUDGE_STEP).clamp(-1.0, 1.0);
            commands.set(wheel, speed);
        }
    }

    /// Forget the last chassis keys, e.g. after a reset zeroed the commands.
    pub fn release(&mut self) {
        self.last_axes = DriveAxes::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_axes_from_keys() {
        let axes = DriveAxes::from_keys(true, false, true, false, false, true);
        assert_eq!(
            axes,
            DriveAxes {
                forward: 1.0,
                strafe: -1.0,
                turn: -1.0
            }
        );
        assert!(DriveAxes::from_keys(true, true, true, true, true, true).is_idle());
    }

    #[test]
    fn test_apply_axes_writes_on_change_only() {
        let commands = WheelCommands::new();
        let mut driver = KeyboardDriver::new();

        let forward = DriveAxes::from_keys(true, false, false, false, false, false);
        assert!(driver.apply_axes(forward, &commands));
        assert_eq!(commands.snapshot(), [1.0; 4]);

        // Holding the same keys leaves a manual change alone.
        commands.set(Wheel::BackRight, 0.3);
        assert!(!driver.apply_axes(forward, &commands));
        assert_eq!(commands.get(Wheel::BackRight), 0.3);

        // Releasing everything stops the robot.
        assert!(driver.apply_axes(DriveAxes::default(), &commands));
        assert_eq!(commands.snapshot(), [0.0; 4]);
    }

    #[test]
    fn test_nudge_selected_wheel() {
        let commands = WheelCommands::new();
        let mut driver = KeyboardDriver::new();
        driver.nudge(1, &commands);
        assert_eq!(commands.snapshot(), [0.0; 4]);

        driver.select_wheel(Wheel::FrontRight);
        driver.nudge(3, &commands);
        assert!((commands.get(Wheel::FrontRight) - 0.3).abs() < EPSILON);
        driver.nudge(-20, &commands);
        assert_eq!(commands.get(Wheel::FrontRight), -1.0);
    }

    #[test]
    fn test_cycle_robot_wraps() {
        let mut driver = KeyboardDriver::new();
        driver.cycle_robot(3);
        driver.cycle_robot(3);
        assert_eq!(driver.selected_robot(), 2);
        driver.cycle_robot(3);
        assert_eq!(driver.selected_robot(), 0);
        driver.cycle_robot(0);
        assert_eq!(driver.selected_robot(), 0);
    }
}
