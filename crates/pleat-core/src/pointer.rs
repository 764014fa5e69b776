//! Pointer position in the normalized control space.

use crate::math::clamp_signed;
use glam::Vec2;

/// Map a pixel position inside a `width` x `height` surface (origin top-left,
/// Y down) to `[-1, 1]²` with Y up and the centre at the origin.
///
/// Positions outside the surface are clamped; a degenerate surface or a
/// non-finite position yields the centre.
#[inline]
pub fn pointer_from_pixels(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
        return Vec2::ZERO;
    }
    Vec2::new(
        clamp_signed((x / width) * 2.0 - 1.0),
        clamp_signed(-((y / height) * 2.0 - 1.0)),
    )
}

/// Pointer tracker fed by window or canvas events.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    position: Vec2,
}

impl PointerState {
    pub fn moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.position = pointer_from_pixels(x, y, width, height);
    }

    /// Already-normalized position; clamped into `[-1, 1]²`.
    pub fn set(&mut self, position: Vec2) {
        self.position = Vec2::new(clamp_signed(position.x), clamp_signed(position.y));
    }

    /// Pointer left the surface: back to neutral.
    pub fn left(&mut self) {
        self.position = Vec2::ZERO;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}
