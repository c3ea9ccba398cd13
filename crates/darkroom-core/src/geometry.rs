//! Geometric primitives for the metering spot.

use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector in frame pixel coordinates.
pub type Vec2 = GlamVec2;

/// Circular region of interest used by the spot meter.
///
/// Recomputed every cycle from the current working-buffer dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotRegion {
    pub center: Vec2,
    pub radius: f32,
}

impl SpotRegion {
    /// Create a region from an explicit center and radius.
    #[inline]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// A spot at the frame center whose radius is `fraction` of the shorter side.
    pub fn centered(width: u32, height: u32, fraction: f32) -> Self {
        let center = Vec2::new(width as f32 * 0.5, height as f32 * 0.5);
        let radius = width.min(height) as f32 * fraction;
        Self { center, radius }
    }

    /// True when pixel `(x, y)` lies within the radius (boundary inclusive).
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        Vec2::new(x as f32, y as f32).distance_squared(self.center) <= self.radius * self.radius
    }
}
