// Math utilities and helper functions

use glam::Vec2;

/// Linear interpolation between two points
pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Both components finite (no NaN, no infinity)
pub fn is_finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
