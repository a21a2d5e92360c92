use crate::foundation::error::{TraceryError, TraceryResult};

pub use kurbo::{Point, Vec2};

/// The side length, in relative units, of every coordinate space: a node's
/// children address their parent's box as a 0–100 square.
pub const SPACE_UNITS: f64 = 100.0;

/// Deterministic seed for the script's random-number source.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Seed(pub i64);

/// Frame counter driving animated scripts.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Tick(pub u64);

/// Output canvas dimensions in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Construct a canvas, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> TraceryResult<Self> {
        if width == 0 || height == 0 {
            return Err(TraceryError::validation("Canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Construct a square canvas.
    pub fn square(size: u32) -> TraceryResult<Self> {
        Self::new(size, size)
    }

    /// The uniform output scale: device pixels per relative unit, taken over
    /// the smaller dimension so the root 0–100 space always fits on screen.
    pub fn unit_scale(self) -> f64 {
        f64::from(self.width.min(self.height)) / SPACE_UNITS
    }
}
