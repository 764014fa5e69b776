//! Keyboard-driven stand-in for a camera hand-landmark detector.
//!
//! The window forwards key presses to a [`SimHandControls`]; the estimator
//! worker owns the matching [`SimulatedHand`] and turns the current pose into
//! 21 keypoints, so the samples go through the same derivation as a real hand.

use pleat_core::{
    DetectorError, HandPoseDetector, Keypoint, VideoFrame, HAND_KEYPOINTS, MIDDLE_MCP, MIDDLE_TIP,
    RATIO_CLOSED, RATIO_SPAN, WRIST,
};
use std::sync::{Arc, Mutex};

const STEP: f32 = 0.05;
const HAND_SIZE: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHandPose {
    pub visible: bool,
    /// 0 = fist, 1 = fully open.
    pub openness: f32,
    /// Middle knuckle in image coordinates (`[0, 1]²`, Y down).
    pub knuckle_x: f32,
    pub knuckle_y: f32,
}

impl Default for SimHandPose {
    fn default() -> Self {
        Self {
            visible: false,
            openness: 1.0,
            knuckle_x: 0.5,
            knuckle_y: 0.5,
        }
    }
}

/// Input keys understood by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    ToggleHand,
    Open,
    Close,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Default)]
pub struct SimHandControls {
    pose: Arc<Mutex<SimHandPose>>,
}

impl SimHandControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detector(&self) -> SimulatedHand {
        SimulatedHand {
            pose: Arc::clone(&self.pose),
        }
    }

    pub fn press(&self, key: SimKey) {
        let Ok(mut pose) = self.pose.lock() else {
            log::error!("[sim] hand state poisoned");
            return;
        };
        match key {
            SimKey::ToggleHand => {
                pose.visible = !pose.visible;
                log::info!("[sim] hand {}", if pose.visible { "shown" } else { "hidden" });
            }
            SimKey::Open => pose.openness = (pose.openness + STEP).min(1.0),
            SimKey::Close => pose.openness = (pose.openness - STEP).max(0.0),
            // the camera is mirrored: moving right means a smaller image x
            SimKey::Left => pose.knuckle_x = (pose.knuckle_x + STEP).min(1.0),
            SimKey::Right => pose.knuckle_x = (pose.knuckle_x - STEP).max(0.0),
            SimKey::Up => pose.knuckle_y = (pose.knuckle_y - STEP).max(0.0),
            SimKey::Down => pose.knuckle_y = (pose.knuckle_y + STEP).min(1.0),
        }
    }

    pub fn pose(&self) -> SimHandPose {
        self.pose.lock().map(|p| *p).unwrap_or_default()
    }
}

pub struct SimulatedHand {
    pose: Arc<Mutex<SimHandPose>>,
}

impl HandPoseDetector for SimulatedHand {
    fn detect(
        &mut self,
        _frame: &VideoFrame<'_>,
        _timestamp_ms: f64,
    ) -> Result<Option<Vec<Keypoint>>, DetectorError> {
        let pose = *self
            .pose
            .lock()
            .map_err(|_| DetectorError::Detect("simulated hand state poisoned".into()))?;
        Ok(pose.visible.then(|| synthesize_keypoints(&pose)))
    }
}

/// Upright hand whose middle finger extends to `RATIO_CLOSED + openness *
/// RATIO_SPAN` hand sizes from the wrist.
pub fn synthesize_keypoints(pose: &SimHandPose) -> Vec<Keypoint> {
    let knuckle = Keypoint::new(pose.knuckle_x, pose.knuckle_y, 0.0);
    let wrist = Keypoint::new(pose.knuckle_x, pose.knuckle_y + HAND_SIZE, 0.0);
    let ratio = RATIO_CLOSED + pose.openness.clamp(0.0, 1.0) * RATIO_SPAN;

    let mut keypoints = vec![knuckle; HAND_KEYPOINTS];
    keypoints[WRIST] = wrist;
    keypoints[MIDDLE_MCP] = knuckle;
    keypoints[MIDDLE_TIP] = Keypoint::new(wrist.x, wrist.y - ratio * HAND_SIZE, 0.0);
    keypoints
}
