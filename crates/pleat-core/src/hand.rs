//! Hand keypoints and the control sample derived from them.
//!
//! Keypoints arrive image-normalized in `[0,1] x [0,1]` (origin top-left, as
//! produced by a selfie camera feed). Only the wrist, the middle-finger base
//! knuckle and the middle fingertip are read; the remaining indices are kept
//! so callers can address a full 21-point hand.

use crate::constants::{HAND_SIZE_EPSILON, RATIO_CLOSED, RATIO_SPAN};
use crate::math::clamp_signed;
use glam::Vec2;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of keypoints a full hand carries.
pub const HAND_KEYPOINTS: usize = 21;
/// Fewest keypoints from which a sample can be derived (through the middle tip).
pub const MIN_KEYPOINTS: usize = MIDDLE_TIP + 1;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Keypoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Position in the image plane; depth is ignored by the derivation.
    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One hand-pose reading as consumed by control fusion.
///
/// `compression` is 0 for an open hand and 1 for a fist. `tilt_x`/`tilt_y`
/// are the knuckle position mirrored and recentred to `[-1, 1]` with up
/// positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSample {
    pub compression: f32,
    pub tilt_x: f32,
    pub tilt_y: f32,
    pub is_tracking: bool,
}

impl ControlSample {
    /// Emitted whenever no hand is available; fusion decays toward it.
    pub const UNTRACKED: ControlSample = ControlSample {
        compression: 0.0,
        tilt_x: 0.0,
        tilt_y: 0.0,
        is_tracking: false,
    };
}

impl Default for ControlSample {
    fn default() -> Self {
        Self::UNTRACKED
    }
}

/// Map the tip-to-wrist / knuckle-to-wrist ratio onto compression.
///
/// A ratio of 1.7 or more is a fully open hand (0), 0.9 or less a fist (1).
#[inline]
pub fn compression_from_ratio(ratio: f32) -> f32 {
    if !ratio.is_finite() {
        return 0.0;
    }
    let openness = ((ratio - RATIO_CLOSED) / RATIO_SPAN).clamp(0.0, 1.0);
    1.0 - openness
}

/// Selfie feeds are mirrored, so the horizontal axis is flipped; the vertical
/// axis is flipped so that raising the hand is positive.
#[inline]
pub fn tilt_from_knuckle(knuckle: &Keypoint) -> Vec2 {
    Vec2::new(
        clamp_signed((1.0 - knuckle.x) * 2.0 - 1.0),
        clamp_signed(-(knuckle.y * 2.0 - 1.0)),
    )
}

/// Derive a [`ControlSample`] from one detected hand.
///
/// Returns [`ControlSample::UNTRACKED`] when the keypoint list is too short,
/// contains non-finite coordinates, or the wrist and knuckle coincide (the
/// ratio would blow up).
pub fn derive_control_sample(keypoints: &[Keypoint]) -> ControlSample {
    let (Some(wrist), Some(knuckle), Some(tip)) = (
        keypoints.get(WRIST),
        keypoints.get(MIDDLE_MCP),
        keypoints.get(MIDDLE_TIP),
    ) else {
        return ControlSample::UNTRACKED;
    };
    if !(wrist.is_finite() && knuckle.is_finite() && tip.is_finite()) {
        return ControlSample::UNTRACKED;
    }

    let hand_size = knuckle.xy().distance(wrist.xy());
    if hand_size < HAND_SIZE_EPSILON {
        return ControlSample::UNTRACKED;
    }
    let extension = tip.xy().distance(wrist.xy());
    let tilt = tilt_from_knuckle(knuckle);

    ControlSample {
        compression: compression_from_ratio(extension / hand_size),
        tilt_x: tilt.x,
        tilt_y: tilt.y,
        is_tracking: true,
    }
}
