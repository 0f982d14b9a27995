//! Time integration of wheel commands into the robot pose.
//!
//! One [`Integrator::step`] turns the current commands and an elapsed time
//! into a pose update. [`Integrator::run`] calls it back to back on the
//! integration thread until told to stop.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ftcsim_kinematics::{Displacement, ForwardKinematics, correct_speed};
use spin_sleep::SpinSleeper;
use tracing::debug;

use crate::lifecycle::StopToken;
use crate::state::{SimState, WHEEL_COUNT};

/// Per-tick wheel turns for the given commands.
///
/// Commands beyond `±1` saturate to `±dt`; everything else scales linearly.
pub fn wheel_turns(commands: [f64; WHEEL_COUNT], dt: f64) -> [f64; WHEEL_COUNT] {
    commands.map(|speed| {
        if speed > 1.0 {
            dt
        } else if speed < -1.0 {
            -dt
        } else {
            speed * dt
        }
    })
}

/// Measures the time between loop iterations.
///
/// The first call only records a baseline, so the first tick after a start
/// never integrates the time spent idle.
#[derive(Debug, Default)]
pub struct TickTimer {
    last: Option<Instant>,
}

impl TickTimer {
    /// A timer with no baseline yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, or `None` on the first call.
    pub fn elapsed(&mut self, now: Instant) -> Option<f64> {
        let dt = self
            .last
            .map(|prev| now.saturating_duration_since(prev).as_secs_f64());
        self.last = Some(now);
        dt
    }
}

/// Integrates wheel commands for one robot.
#[derive(Debug)]
pub struct Integrator<K> {
    kinematics: K,
    max_speed: f64,
    state: Arc<SimState>,
}

impl<K: ForwardKinematics<WHEEL_COUNT>> Integrator<K> {
    /// `max_speed` is the drivetrain's top linear speed per second, in the
    /// same unit the kinematics produce.
    pub fn new(kinematics: K, max_speed: f64, state: Arc<SimState>) -> Self {
        Integrator {
            kinematics,
            max_speed,
            state,
        }
    }

    /// State this integrator writes.
    pub fn state(&self) -> &Arc<SimState> {
        &self.state
    }

    /// Advance the pose by `dt` seconds of the current commands.
    ///
    /// Returns the robot-frame displacement the solver produced.
    pub fn step(&self, dt: f64) -> Displacement {
        let turns = wheel_turns(self.state.commands.snapshot(), dt);

        for (wheel, turn) in self.state.wheels.iter().zip(turns) {
            wheel.advance(-turn);
        }

        let d = self.kinematics.solve(turns);
        let distance = correct_speed(d.distance(), d.direction(), self.max_speed * dt);
        let angle = d.direction() - self.state.pose.theta();

        self.state
            .pose
            .translate(distance * angle.cos(), distance * angle.sin(), d.dtheta);
        d
    }

    /// One loop iteration at time `now`. Returns whether the pose was
    /// integrated.
    ///
    /// The first call only sets the timer baseline. A stop raised at any point
    /// before the pose write cancels it.
    pub fn tick(&self, timer: &mut TickTimer, token: &StopToken, now: Instant) -> bool {
        match timer.elapsed(now) {
            Some(dt) => token.unless_stopped(|| self.step(dt)).is_some(),
            None => false,
        }
    }

    /// Step continuously until `token` is stopped. Returns the number of
    /// integrating ticks.
    ///
    /// With a zero `tick_period` the loop only yields between ticks.
    pub fn run(&self, token: &StopToken, tick_period: Duration) -> u64 {
        let sleeper = SpinSleeper::new(100_000);
        let mut timer = TickTimer::new();
        let mut ticks = 0;

        while !token.is_stopped() {
            if self.tick(&mut timer, token, Instant::now()) {
                ticks += 1;
            }
            if tick_period.is_zero() {
                thread::yield_now();
            } else {
                sleeper.sleep(tick_period);
            }
        }

        debug!(ticks, pose = %self.state.pose.load(), "Integration loop finished.");
        ticks
    }
}
