use thiserror::Error;

/// Construction-time validation failures for a wall.
///
/// These are only produced while building a wall from a captured photo; the
/// per-frame path never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WallError {
    #[error("strip count must be between 1 and {max}, got {got}")]
    InvalidStrips { got: usize, max: usize },
    #[error("wall {name} must be finite and positive, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },
    #[error("photo aspect ratio must be finite and positive, got {0}")]
    InvalidAspect(f32),
    #[error("noise table has {got} entries but the wall has {strips} strips")]
    NoiseTableMismatch { got: usize, strips: usize },
    #[error("noise values must lie in [0, 1), found {0}")]
    NoiseOutOfRange(f32),
    #[error("tuning value {name} is out of range: {value}")]
    InvalidTuning { name: &'static str, value: f32 },
}

/// Failures reported by an external hand-pose detector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    #[error("detector failed to initialize: {0}")]
    Init(String),
    #[error("camera access denied")]
    PermissionDenied,
    #[error("detection failed: {0}")]
    Detect(String),
}
