//! Boundary to the external hand-landmark detector.
//!
//! The detector itself is a black box. [`HandPoseEstimator`] wraps it so that
//! the rest of the core only ever sees [`ControlSample`]s: frames with a
//! repeated timestamp are skipped, and a missing, denied or failing detector
//! degrades to untracked samples (pointer-only control) instead of an error.

use crate::error::DetectorError;
use crate::hand::{derive_control_sample, ControlSample, Keypoint};

/// Borrowed view of one decoded RGB frame.
#[derive(Clone, Copy, Debug)]
pub struct VideoFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub rgb: &'a [u8],
}

impl VideoFrame<'static> {
    /// Placeholder for detectors that capture on their own.
    pub const EMPTY: VideoFrame<'static> = VideoFrame {
        width: 0,
        height: 0,
        rgb: &[],
    };
}

/// Owned frame as handed over by a capture source.
#[derive(Clone, Debug, Default)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub timestamp_ms: f64,
}

impl CapturedFrame {
    /// Frame without pixels, only a timestamp.
    pub fn timestamp_only(timestamp_ms: f64) -> Self {
        Self {
            timestamp_ms,
            ..Default::default()
        }
    }

    pub fn view(&self) -> VideoFrame<'_> {
        VideoFrame {
            width: self.width,
            height: self.height,
            rgb: &self.rgb,
        }
    }
}

/// A hand-landmark detector (e.g. a MediaPipe-style landmarker).
///
/// Returns the keypoints of at most one hand, image-normalized, or `None` if
/// no hand is visible.
pub trait HandPoseDetector {
    fn detect(
        &mut self,
        frame: &VideoFrame<'_>,
        timestamp_ms: f64,
    ) -> Result<Option<Vec<Keypoint>>, DetectorError>;
}

/// Admits each timestamp at most once, in strictly increasing order.
#[derive(Clone, Debug, Default)]
pub struct FrameGate {
    last_ms: Option<f64>,
}

impl FrameGate {
    pub fn admit(&mut self, timestamp_ms: f64) -> bool {
        if !timestamp_ms.is_finite() {
            return false;
        }
        match self.last_ms {
            Some(prev) if timestamp_ms <= prev => false,
            _ => {
                self.last_ms = Some(timestamp_ms);
                true
            }
        }
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_ms
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

pub struct HandPoseEstimator<D> {
    detector: Option<D>,
    gate: FrameGate,
    last: ControlSample,
    failing: bool,
}

impl<D: HandPoseDetector> HandPoseEstimator<D> {
    pub fn new(detector: D) -> Self {
        Self {
            detector: Some(detector),
            gate: FrameGate::default(),
            last: ControlSample::UNTRACKED,
            failing: false,
        }
    }

    /// Build from a detector that may have failed to initialize (no camera,
    /// permission denied, model missing). A failed init yields an estimator
    /// that only ever reports untracked samples.
    pub fn from_init(detector: Result<D, DetectorError>) -> Self {
        match detector {
            Ok(d) => Self::new(d),
            Err(e) => {
                log::warn!("[hand] estimator unavailable ({e}); pointer-only control");
                Self {
                    detector: None,
                    gate: FrameGate::default(),
                    last: ControlSample::UNTRACKED,
                    failing: true,
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.detector.is_some()
    }

    pub fn last_sample(&self) -> ControlSample {
        self.last
    }

    /// The wrapped detector, if it initialized.
    pub fn detector_mut(&mut self) -> Option<&mut D> {
        self.detector.as_mut()
    }

    /// Run detection on one frame.
    ///
    /// Returns `None` when the timestamp was already seen (the frame is not
    /// re-detected), otherwise the sample for this frame.
    pub fn process(&mut self, frame: &VideoFrame<'_>, timestamp_ms: f64) -> Option<ControlSample> {
        if !self.gate.admit(timestamp_ms) {
            return None;
        }
        let sample = match self.detector.as_mut() {
            None => ControlSample::UNTRACKED,
            Some(detector) => match detector.detect(frame, timestamp_ms) {
                Ok(Some(keypoints)) => {
                    self.failing = false;
                    derive_control_sample(&keypoints)
                }
                Ok(None) => {
                    self.failing = false;
                    ControlSample::UNTRACKED
                }
                Err(e) => {
                    // one warning per failure streak, not per frame
                    if !self.failing {
                        log::warn!("[hand] detection failed: {e}");
                    }
                    self.failing = true;
                    ControlSample::UNTRACKED
                }
            },
        };
        self.last = sample;
        Some(sample)
    }
}
