#![cfg(target_arch = "wasm32")]
//! Browser front-end. The JS host owns the camera, the hand landmarker and the
//! renderer; this module owns the wall and hands it vertex data every frame.

use instant::Instant;
use pleat_core::{
    derive_control_sample, ControlSample, DetectorError, FrameOutput, HandPoseEstimator, Phase,
    PointerState, SharedSample, VideoFrame, WallConfig, WallSession,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod events;
mod input;
mod landmarks;

use landmarks::{decode_landmarks, PushedLandmarks};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("[app] pleat-web ready");
    Ok(())
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn build_session(strips: usize, seed: u32, fit_to_photo: bool) -> anyhow::Result<WallSession> {
    let config = WallConfig {
        fit_to_photo,
        ..WallConfig::default()
    }
    .with_strips(strips)
    .with_seed(seed as u64);
    Ok(WallSession::new(config)?)
}

#[wasm_bindgen]
pub struct PleatWall {
    session: WallSession,
    hand: SharedSample,
    estimator: HandPoseEstimator<PushedLandmarks>,
    pointer: Rc<RefCell<PointerState>>,
    output: Option<FrameOutput>,
    last_instant: Option<Instant>,
}

#[wasm_bindgen]
impl PleatWall {
    #[wasm_bindgen(constructor)]
    pub fn new(strips: usize, seed: u32, fit_to_photo: bool) -> Result<PleatWall, JsValue> {
        let session = build_session(strips, seed, fit_to_photo).map_err(js_err)?;
        Ok(Self {
            session,
            hand: SharedSample::default(),
            estimator: HandPoseEstimator::new(PushedLandmarks::default()),
            pointer: Rc::new(RefCell::new(PointerState::default())),
            output: None,
            last_instant: None,
        })
    }

    /// Track the pointer over `canvas` instead of calling `set_pointer`.
    pub fn attach_pointer(&self, canvas: &web::HtmlCanvasElement) {
        events::wire_pointer(canvas, Rc::clone(&self.pointer));
    }

    /// Normalized pointer (`[-1, 1]²`, Y up) for hosts that track it themselves.
    pub fn set_pointer(&self, x: f32, y: f32) {
        self.pointer.borrow_mut().set(glam::Vec2::new(x, y));
    }

    pub fn begin_capture(&mut self) -> bool {
        self.session.begin_capture()
    }

    /// The host captured a `width` x `height` photo; build the wall.
    pub fn photo_ready(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.session.photo_ready(width, height).map_err(js_err)?;
        if self.session.phase() == Phase::Processing {
            self.hand.set(ControlSample::UNTRACKED);
            self.session.attach_source(Box::new(self.hand.clone()));
        }
        Ok(())
    }

    /// The landmarker could not start (no camera, permission denied, model
    /// failed to load). The wall stays pointer-driven.
    pub fn detector_unavailable(&mut self, reason: String, permission_denied: bool) {
        let err = if permission_denied {
            DetectorError::PermissionDenied
        } else {
            DetectorError::Init(reason)
        };
        self.estimator = HandPoseEstimator::from_init(Err(err));
        self.hand.set(ControlSample::UNTRACKED);
    }

    /// One landmarker result: flat `[x, y, z]` per keypoint, image-normalized.
    /// Returns `false` if the timestamp was already processed.
    pub fn push_landmarks(&mut self, flat: &[f32], timestamp_ms: f64) -> bool {
        let keypoints = decode_landmarks(flat);
        self.run_estimator(timestamp_ms, |d| d.push(keypoints))
    }

    pub fn push_no_hand(&mut self, timestamp_ms: f64) -> bool {
        self.run_estimator(timestamp_ms, |d| d.push(None))
    }

    pub fn push_detector_error(&mut self, message: String, timestamp_ms: f64) -> bool {
        self.run_estimator(timestamp_ms, |d| d.push_error(message))
    }

    /// Advance the session by the time since the previous call and fold the
    /// wall. Returns `true` when there is geometry to draw.
    pub fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = self
            .last_instant
            .map(|prev| now.duration_since(prev))
            .unwrap_or(Duration::ZERO);
        self.last_instant = Some(now);
        self.step(dt);
        self.session.wall().is_some()
    }

    /// Same as `frame` with an explicit step in milliseconds.
    pub fn frame_with_dt(&mut self, dt_ms: f64) -> bool {
        let dt = if dt_ms.is_finite() && dt_ms > 0.0 {
            Duration::from_secs_f64(dt_ms / 1000.0)
        } else {
            Duration::ZERO
        };
        self.step(dt);
        self.session.wall().is_some()
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.phase())
    }

    /// `2 * (strips + 1) * 3` floats: top row then bottom row.
    pub fn positions(&self) -> js_sys::Float32Array {
        match self.session.wall() {
            Some(wall) => js_sys::Float32Array::from(wall.vertices().as_flat()),
            None => js_sys::Float32Array::new_with_length(0),
        }
    }

    pub fn uvs(&self) -> js_sys::Float32Array {
        let flat: Vec<f32> = self
            .session
            .wall()
            .map(|w| w.uvs().iter().flat_map(|uv| uv.to_array()).collect())
            .unwrap_or_default();
        js_sys::Float32Array::from(flat.as_slice())
    }

    pub fn indices(&self) -> js_sys::Uint32Array {
        match self.session.wall() {
            Some(wall) => js_sys::Uint32Array::from(wall.indices()),
            None => js_sys::Uint32Array::new_with_length(0),
        }
    }

    /// Column-major model matrix from the smoothed orientation.
    pub fn model_matrix(&self) -> js_sys::Float32Array {
        let m = self
            .session
            .wall()
            .map(|w| w.orientation().model_matrix())
            .unwrap_or(glam::Mat4::IDENTITY);
        js_sys::Float32Array::from(m.to_cols_array().as_slice())
    }

    /// `[rotation_x, rotation_y]` in radians.
    pub fn rotation(&self) -> Vec<f32> {
        self.session
            .wall()
            .map(|w| w.rotation().to_array().to_vec())
            .unwrap_or_else(|| vec![0.0, 0.0])
    }

    /// `[min_x, min_y, min_z, max_x, max_y, max_z, radius]`.
    pub fn bounds(&self) -> Vec<f32> {
        let b = self.output.map(|o| o.bounds).unwrap_or_default();
        let mut out = Vec::with_capacity(7);
        out.extend_from_slice(&b.min.to_array());
        out.extend_from_slice(&b.max.to_array());
        out.push(b.bounding_radius());
        out
    }

    pub fn effective_compression(&self) -> f32 {
        self.output
            .map(|o| o.control.effective_compression)
            .unwrap_or(0.0)
    }

    pub fn hand_tracking(&self) -> bool {
        self.hand.get().is_tracking
    }

    pub fn set_strips(&mut self, strips: usize) -> Result<(), JsValue> {
        self.session.set_strips(strips).map_err(js_err)?;
        self.output = self.session.wall().map(|w| w.last_output());
        Ok(())
    }

    /// Discard the wall and any pending landmarker state.
    pub fn reset(&mut self) {
        self.session.reset();
        self.estimator = HandPoseEstimator::new(PushedLandmarks::default());
        self.hand.set(ControlSample::UNTRACKED);
        self.output = None;
        self.last_instant = None;
    }
}

impl PleatWall {
    fn run_estimator(&mut self, timestamp_ms: f64, feed: impl FnOnce(&mut PushedLandmarks)) -> bool {
        if let Some(detector) = self.estimator.detector_mut() {
            feed(detector);
        }
        match self.estimator.process(&VideoFrame::EMPTY, timestamp_ms) {
            Some(sample) => {
                self.hand.set(sample);
                true
            }
            None => {
                // repeated timestamp: drop the result instead of leaking it into the next frame
                if let Some(detector) = self.estimator.detector_mut() {
                    detector.push(None);
                }
                false
            }
        }
    }

    fn step(&mut self, dt: Duration) {
        self.session.tick(dt);
        self.output = match self.session.phase() {
            Phase::Interactive => self.session.frame(self.pointer.borrow().position()),
            _ => self.session.wall().map(|w| w.last_output()),
        };
    }
}

/// Compression a landmark array maps to, without a wall (calibration UIs).
#[wasm_bindgen]
pub fn compression_for_landmarks(flat: &[f32]) -> f32 {
    decode_landmarks(flat)
        .map(|kp| derive_control_sample(&kp))
        .filter(|s| s.is_tracking)
        .map(|s| s.compression)
        .unwrap_or(0.0)
}
