//! Roller animation state for the drawn wheels.
//!
//! Nothing in here feeds back into the kinematics; it only tracks how far the
//! roller stripes have scrolled so the renderer can animate them.

use crate::atomic::AtomicF64;

/// Number of roller stripes drawn per wheel.
pub const ROLLER_LINES: usize = 6;

/// Direction the roller stripes slant, mirrored between wheel pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelHand {
    /// Stripes fall from left to right.
    Right,
    /// Stripes rise from left to right.
    Left,
}

/// One roller stripe in wheel-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RollerLine {
    /// Start point, wheel-local.
    pub start: (f64, f64),
    /// End point, wheel-local.
    pub end: (f64, f64),
}

impl RollerLine {
    /// The part of this stripe inside the band `0 <= y <= width`, if any.
    pub fn clipped(&self, width: f64) -> Option<RollerLine> {
        let (x0, y0) = self.start;
        let (x1, y1) = self.end;
        let dy = y1 - y0;
        if dy == 0.0 {
            return (0.0..=width).contains(&y0).then_some(*self);
        }
        let t_at = |y: f64| (y - y0) / dy;
        let (mut t_min, mut t_max) = (t_at(0.0), t_at(width));
        if t_min > t_max {
            std::mem::swap(&mut t_min, &mut t_max);
        }
        let (t0, t1) = (t_min.max(0.0), t_max.min(1.0));
        if t0 >= t1 {
            return None;
        }
        let point = |t: f64| (x0 + t * (x1 - x0), y0 + t * dy);
        Some(RollerLine {
            start: point(t0),
            end: point(t1),
        })
    }
}

/// Scroll position of one wheel's roller stripes.
#[derive(Debug)]
pub struct WheelVisual {
    hand: WheelHand,
    length: f64,
    width: f64,
    roll: AtomicF64,
}

impl WheelVisual {
    /// A wheel drawn `length` across and `width` along the direction of travel.
    pub fn new(hand: WheelHand, length: f64, width: f64) -> Self {
        WheelVisual {
            hand,
            length,
            width,
            roll: AtomicF64::new(0.0),
        }
    }

    /// Stripe direction.
    pub fn hand(&self) -> WheelHand {
        self.hand
    }

    /// Size across the direction of travel.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Size along the direction of travel.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Distance between neighbouring stripes.
    pub fn spacing(&self) -> f64 {
        self.width / (ROLLER_LINES - 2) as f64
    }

    /// Current scroll position, always in `[0, spacing)`.
    pub fn roll_position(&self) -> f64 {
        self.roll.load()
    }

    /// Scroll the stripes by `turns` wheel turns.
    pub fn advance(&self, turns: f64) {
        let spacing = self.spacing();
        let width = self.width;
        self.roll.update(|roll| {
            let wrapped = (roll + turns * width).rem_euclid(spacing);
            // rem_euclid rounds tiny negatives up to `spacing` itself.
            if wrapped >= spacing { 0.0 } else { wrapped }
        });
    }

    /// Stripe segments for a given scroll position.
    pub fn roller_lines(&self, roll: f64) -> [RollerLine; ROLLER_LINES] {
        let spacing = self.spacing();
        let mut lines = [RollerLine::default(); ROLLER_LINES];
        for (i, line) in lines.iter_mut().enumerate() {
            let upper = roll + (i as f64 - 1.0) * spacing;
            let lower = roll + i as f64 * spacing;
            *line = match self.hand {
                WheelHand::Right => RollerLine {
                    start: (0.0, upper),
                    end: (self.length, lower),
                },
                WheelHand::Left => RollerLine {
                    start: (0.0, lower),
                    end: (self.length, upper),
                },
            };
        }
        lines
    }
}
