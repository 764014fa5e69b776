use std::f32::consts::PI;

// Shared fold/fusion tuning constants used by both web and native frontends.

// Hand derivation
pub const RATIO_CLOSED: f32 = 0.9; // tip/knuckle ratio at or below this is a fist
pub const RATIO_SPAN: f32 = 0.8; // ratio range mapped onto 0..1 (open at 1.7)
pub const HAND_SIZE_EPSILON: f32 = 1e-4; // wrist-knuckle distances below this are not a hand

// Control fusion (per-frame lerp factors)
pub const COMPRESSION_LERP: f32 = 0.1;
pub const TILT_LERP: f32 = 0.05; // tilt settles slower than compression
pub const POINTER_TILT_X_WEIGHT: f32 = 0.3; // pointer.y -> rotation about X
pub const POINTER_TILT_Y_WEIGHT: f32 = 0.2; // pointer.x -> rotation about Y

// Fold geometry
pub const COMPRESSION_ANGLE_GAIN: f32 = 1.3; // radians at full compression
pub const WOBBLE_SPEED: f32 = 1.5; // rad/s
pub const WOBBLE_PHASE_STEP: f32 = 0.3; // phase offset between neighbouring strips
pub const WOBBLE_AMPLITUDE: f32 = 0.15;
pub const WOBBLE_WEIGHT: f32 = 0.1;
pub const NOISE_WEIGHT: f32 = 0.1;
pub const MAX_FOLD_ANGLE: f32 = PI / 2.05; // just under a right angle

// Orientation
pub const ORIENTATION_GAIN: f32 = 0.5;
pub const ORIENTATION_LERP: f32 = 0.1;

// Wall defaults
pub const DEFAULT_STRIPS: usize = 24;
pub const DEFAULT_WALL_WIDTH: f32 = 16.0;
pub const DEFAULT_WALL_HEIGHT: f32 = 10.0;
pub const DEFAULT_NOISE_SEED: u64 = 42;
// largest strip count whose vertex indices (up to 2 * strips + 1) fit in u32
pub const MAX_STRIPS: usize = (u32::MAX as usize - 2) / 2;

// Session
pub const PROCESSING_DELAY_MS: u64 = 800;

// Estimator cadence (native worker); the detector is bound by the video rate
pub const ESTIMATOR_INTERVAL_MS: u64 = 33;
