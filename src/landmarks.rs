use pleat_core::{DetectorError, HandPoseDetector, Keypoint, VideoFrame};

/// Decode a flat `[x0, y0, z0, x1, y1, z1, ...]` landmark array.
///
/// `None` for an empty array or one whose length is not a multiple of three.
pub fn decode_landmarks(flat: &[f32]) -> Option<Vec<Keypoint>> {
    if flat.is_empty() || flat.len() % 3 != 0 {
        return None;
    }
    Some(
        flat.chunks_exact(3)
            .map(|c| Keypoint::new(c[0], c[1], c[2]))
            .collect(),
    )
}

/// Detector whose results are pushed in from the JS landmarker.
///
/// Each pushed result is consumed by exactly one `detect` call; afterwards it
/// reports "no hand" until the next push.
pub struct PushedLandmarks {
    next: Result<Option<Vec<Keypoint>>, DetectorError>,
}

impl Default for PushedLandmarks {
    fn default() -> Self {
        Self { next: Ok(None) }
    }
}

impl PushedLandmarks {
    pub fn push(&mut self, keypoints: Option<Vec<Keypoint>>) {
        self.next = Ok(keypoints);
    }

    pub fn push_error(&mut self, message: String) {
        self.next = Err(DetectorError::Detect(message));
    }
}

impl HandPoseDetector for PushedLandmarks {
    fn detect(
        &mut self,
        _frame: &VideoFrame<'_>,
        _timestamp_ms: f64,
    ) -> Result<Option<Vec<Keypoint>>, DetectorError> {
        std::mem::replace(&mut self.next, Ok(None))
    }
}
