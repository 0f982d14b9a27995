use serde::{Deserialize, Serialize};

/// Display color used to tell robots apart. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotColor {
    /// Blue, the default.
    #[default]
    Blue,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Purple.
    Purple,
}

impl RobotColor {
    /// Light and dark ends of the body gradient as RGB, shaded from the
    /// bottom-left corner to the top-right.
    pub const fn gradient(self) -> ([u8; 3], [u8; 3]) {
        match self {
            RobotColor::Blue => ([0x53, 0xa0, 0xd4], [0x0c, 0x7d, 0xc9]),
            RobotColor::Red => ([0xde, 0x59, 0x68], [0xc9, 0x00, 0x17]),
            RobotColor::Green => ([0x85, 0xe6, 0x90], [0x0b, 0xb5, 0x1e]),
            RobotColor::Purple => ([0xac, 0x58, 0xe8], [0x89, 0x12, 0xde]),
        }
    }
}

/// Gray gradient of the drawn wheels.
pub const WHEEL_GRADIENT: ([u8; 3], [u8; 3]) = ([0x6e, 0x6e, 0x6e], [0x8c, 0x8c, 0x8c]);

/// Linear mix of two RGB colors, `t = 0` giving `from`.
pub fn blend(from: [u8; 3], to: [u8; 3], t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    core::array::from_fn(|i| {
        (from[i] as f64 + (to[i] as f64 - from[i] as f64) * t).round() as u8
    })
}

/// Corner colors of a rectangle shaded from its bottom-left (`start`) to its
/// top-right (`end`), in the order top-left, top-right, bottom-right,
/// bottom-left of y-down local space.
///
/// Shading two triangles split along the top-left/bottom-right diagonal with
/// these colors gives a linear gradient.
pub fn diagonal_corners((start, end): ([u8; 3], [u8; 3])) -> [[u8; 3]; 4] {
    let mid = blend(start, end, 0.5);
    [mid, end, mid, start]
}
