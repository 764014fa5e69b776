//! Control fusion: hand sample + pointer -> effective compression and tilt.
//!
//! The hand channel is low-pass filtered every frame (compression faster than
//! tilt). Fold amount then follows whichever channel asks for more folding,
//! while pointer and hand tilt add up.

use crate::config::FusionTuning;
use crate::hand::ControlSample;
use crate::math::{clamp_signed, clamp_unit};
use glam::{FloatExt, Vec2};

/// Low-pass filtered hand channel. Lives as long as the wall.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SmoothedControlState {
    pub compression: f32,
    pub tilt_x: f32,
    pub tilt_y: f32,
}

/// Output of one fusion step.
///
/// `tilt_x` drives rotation about the X axis (vertical hand/pointer motion),
/// `tilt_y` rotation about the Y axis (horizontal motion).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FusedControl {
    pub effective_compression: f32,
    pub tilt_x: f32,
    pub tilt_y: f32,
}

/// Whichever channel demands more folding wins.
#[inline]
pub fn max_precedence(smoothed_compression: f32, pointer_compression: f32) -> f32 {
    smoothed_compression.max(pointer_compression)
}

#[derive(Clone, Debug, Default)]
pub struct ControlFusion {
    state: SmoothedControlState,
    tuning: FusionTuning,
}

impl ControlFusion {
    pub fn new(tuning: FusionTuning) -> Self {
        Self {
            state: SmoothedControlState::default(),
            tuning,
        }
    }

    pub fn state(&self) -> SmoothedControlState {
        self.state
    }

    pub fn tuning(&self) -> &FusionTuning {
        &self.tuning
    }

    /// Advance the filter by one frame and fuse with the pointer.
    ///
    /// `sample` may be unchanged since the previous frame; re-smoothing toward
    /// the same target is a no-op at steady state.
    pub fn update(&mut self, sample: &ControlSample, pointer: Vec2) -> FusedControl {
        let t = &self.tuning;
        let s = &mut self.state;
        s.compression = s.compression.lerp(clamp_unit(sample.compression), t.compression_lerp);
        s.tilt_x = s.tilt_x.lerp(clamp_signed(sample.tilt_x), t.tilt_lerp);
        s.tilt_y = s.tilt_y.lerp(clamp_signed(sample.tilt_y), t.tilt_lerp);

        let px = clamp_signed(pointer.x);
        let py = clamp_signed(pointer.y);

        FusedControl {
            effective_compression: max_precedence(s.compression, px.abs()),
            tilt_x: s.tilt_y + py * t.pointer_tilt_x,
            tilt_y: s.tilt_x + px * t.pointer_tilt_y,
        }
    }
}
