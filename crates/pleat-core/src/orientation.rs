use crate::config::OrientationTuning;
use glam::{EulerRot, FloatExt, Mat4, Vec2};

/// Second smoothing stage turning fused tilt into mesh rotation (radians).
#[derive(Clone, Debug, Default)]
pub struct OrientationController {
    rotation: Vec2,
    tuning: OrientationTuning,
}

impl OrientationController {
    pub fn new(tuning: OrientationTuning) -> Self {
        Self {
            rotation: Vec2::ZERO,
            tuning,
        }
    }

    /// `x` is the rotation about the X axis, `y` about the Y axis.
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn update(&mut self, tilt_x: f32, tilt_y: f32) -> Vec2 {
        let OrientationTuning { gain, lerp: k } = self.tuning;
        if tilt_x.is_finite() {
            self.rotation.x = self.rotation.x.lerp(tilt_x * gain, k);
        }
        if tilt_y.is_finite() {
            self.rotation.y = self.rotation.y.lerp(tilt_y * gain, k);
        }
        self.rotation
    }

    /// Model matrix applying X then Y rotation (Euler XYZ, Z fixed at 0).
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }
}
