//! Tuning and wall configuration.
//!
//! Every value defaults to the matching entry in `constants.rs`. Front-ends
//! tweak a [`WallConfig`] and hand it to the session, which validates it once
//! at construction time.

use crate::constants::*;
use crate::error::WallError;
use crate::geometry::WallParams;
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

/// Parameters of the per-strip fold angle.
///
/// - `compression_gain`: radians of fold per unit of effective compression
/// - `wobble_*`: the time-based breathing wave (`sin(t*speed + i*phase_step) * amplitude`)
/// - `noise_weight`: scale of the per-strip noise offset, multiplied by compression
/// - `max_angle`: per-segment clamp, must stay below a right angle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldTuning {
    pub compression_gain: f32,
    pub wobble_speed: f32,
    pub wobble_phase_step: f32,
    pub wobble_amplitude: f32,
    pub wobble_weight: f32,
    pub noise_weight: f32,
    pub max_angle: f32,
}

impl Default for FoldTuning {
    fn default() -> Self {
        Self {
            compression_gain: COMPRESSION_ANGLE_GAIN,
            wobble_speed: WOBBLE_SPEED,
            wobble_phase_step: WOBBLE_PHASE_STEP,
            wobble_amplitude: WOBBLE_AMPLITUDE,
            wobble_weight: WOBBLE_WEIGHT,
            noise_weight: NOISE_WEIGHT,
            max_angle: MAX_FOLD_ANGLE,
        }
    }
}

impl FoldTuning {
    /// Same tuning with the breathing wave switched off.
    pub fn without_wobble(self) -> Self {
        Self {
            wobble_amplitude: 0.0,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), WallError> {
        finite("compression_gain", self.compression_gain)?;
        finite("wobble_speed", self.wobble_speed)?;
        finite("wobble_phase_step", self.wobble_phase_step)?;
        non_negative("wobble_amplitude", self.wobble_amplitude)?;
        non_negative("wobble_weight", self.wobble_weight)?;
        non_negative("noise_weight", self.noise_weight)?;
        if !(self.max_angle > 0.0 && self.max_angle < FRAC_PI_2) {
            return Err(WallError::InvalidTuning {
                name: "max_angle",
                value: self.max_angle,
            });
        }
        Ok(())
    }
}

/// Per-frame smoothing and pointer weights used by control fusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FusionTuning {
    pub compression_lerp: f32,
    pub tilt_lerp: f32,
    pub pointer_tilt_x: f32,
    pub pointer_tilt_y: f32,
}

impl Default for FusionTuning {
    fn default() -> Self {
        Self {
            compression_lerp: COMPRESSION_LERP,
            tilt_lerp: TILT_LERP,
            pointer_tilt_x: POINTER_TILT_X_WEIGHT,
            pointer_tilt_y: POINTER_TILT_Y_WEIGHT,
        }
    }
}

impl FusionTuning {
    pub fn validate(&self) -> Result<(), WallError> {
        lerp_factor("compression_lerp", self.compression_lerp)?;
        lerp_factor("tilt_lerp", self.tilt_lerp)?;
        finite("pointer_tilt_x", self.pointer_tilt_x)?;
        finite("pointer_tilt_y", self.pointer_tilt_y)
    }
}

/// Second-stage rotation smoothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationTuning {
    pub gain: f32,
    pub lerp: f32,
}

impl Default for OrientationTuning {
    fn default() -> Self {
        Self {
            gain: ORIENTATION_GAIN,
            lerp: ORIENTATION_LERP,
        }
    }
}

impl OrientationTuning {
    pub fn validate(&self) -> Result<(), WallError> {
        finite("orientation_gain", self.gain)?;
        lerp_factor("orientation_lerp", self.lerp)
    }
}

/// Everything needed to build a wall once a photo has been captured.
///
/// When `fit_to_photo` is set the width is derived from the photo aspect and
/// `height`; otherwise `width` is used as is.
#[derive(Clone, Debug, PartialEq)]
pub struct WallConfig {
    pub width: f32,
    pub height: f32,
    pub strips: usize,
    pub seed: u64,
    pub fit_to_photo: bool,
    pub processing_delay: Duration,
    pub fold: FoldTuning,
    pub fusion: FusionTuning,
    pub orientation: OrientationTuning,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WALL_WIDTH,
            height: DEFAULT_WALL_HEIGHT,
            strips: DEFAULT_STRIPS,
            seed: DEFAULT_NOISE_SEED,
            fit_to_photo: false,
            processing_delay: Duration::from_millis(PROCESSING_DELAY_MS),
            fold: FoldTuning::default(),
            fusion: FusionTuning::default(),
            orientation: OrientationTuning::default(),
        }
    }
}

impl WallConfig {
    pub fn with_strips(mut self, strips: usize) -> Self {
        self.strips = strips;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check all tuning and produce the geometry parameters for the configured size.
    pub fn validate(&self) -> Result<WallParams, WallError> {
        self.fold.validate()?;
        self.fusion.validate()?;
        self.orientation.validate()?;
        WallParams::new(self.width, self.height, self.strips)
    }

    /// Geometry parameters for a captured photo of `width_px` x `height_px`.
    pub fn params_for_photo(&self, width_px: u32, height_px: u32) -> Result<WallParams, WallError> {
        let params = self.validate()?;
        if !self.fit_to_photo {
            return Ok(params);
        }
        if width_px == 0 || height_px == 0 {
            return Err(WallError::InvalidAspect(0.0));
        }
        let aspect = width_px as f32 / height_px as f32;
        WallParams::fit_to_photo(aspect, self.height, self.strips)
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), WallError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(WallError::InvalidTuning { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), WallError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WallError::InvalidTuning { name, value })
    }
}

// Factors outside (0, 1] either never move or overshoot and oscillate.
fn lerp_factor(name: &'static str, value: f32) -> Result<(), WallError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(WallError::InvalidTuning { name, value })
    }
}
