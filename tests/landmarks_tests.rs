// Host-side tests for landmark decoding and the pushed-result detector.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod landmarks {
    include!("../src/landmarks.rs");
}

use landmarks::*;
use pleat_core::{
    derive_control_sample, ControlSample, HandPoseEstimator, Keypoint, VideoFrame,
    HAND_KEYPOINTS, MIDDLE_MCP, MIDDLE_TIP, WRIST,
};

fn flat_fist() -> Vec<f32> {
    let mut kp = vec![Keypoint::default(); HAND_KEYPOINTS];
    kp[WRIST] = Keypoint::new(0.5, 0.9, 0.0);
    kp[MIDDLE_MCP] = Keypoint::new(0.5, 0.7, -0.02);
    kp[MIDDLE_TIP] = Keypoint::new(0.5, 0.75, -0.05);
    kp.iter().flat_map(|k| [k.x, k.y, k.z]).collect()
}

#[test]
fn decodes_triples_in_order() {
    let kp = decode_landmarks(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
    assert_eq!(kp, vec![Keypoint::new(0.1, 0.2, 0.3), Keypoint::new(0.4, 0.5, 0.6)]);
}

#[test]
fn rejects_empty_or_ragged_arrays() {
    assert_eq!(decode_landmarks(&[]), None);
    assert_eq!(decode_landmarks(&[0.1, 0.2]), None);
    assert_eq!(decode_landmarks(&[0.1, 0.2, 0.3, 0.4]), None);
}

#[test]
fn decoded_fist_folds_fully() {
    let kp = decode_landmarks(&flat_fist()).unwrap();
    assert_eq!(kp.len(), HAND_KEYPOINTS);
    assert_eq!(derive_control_sample(&kp).compression, 1.0);
}

#[test]
fn pushed_result_is_consumed_once() {
    let mut estimator = HandPoseEstimator::new(PushedLandmarks::default());
    let fist = decode_landmarks(&flat_fist());
    if let Some(d) = estimator.detector_mut() {
        d.push(fist);
    }
    let first = estimator.process(&VideoFrame::EMPTY, 16.0).unwrap();
    assert!(first.is_tracking);
    let second = estimator.process(&VideoFrame::EMPTY, 32.0).unwrap();
    assert_eq!(second, ControlSample::UNTRACKED);
}

#[test]
fn pushed_error_degrades_to_untracked() {
    let mut estimator = HandPoseEstimator::new(PushedLandmarks::default());
    if let Some(d) = estimator.detector_mut() {
        d.push_error("landmarker threw".into());
    }
    assert_eq!(
        estimator.process(&VideoFrame::EMPTY, 1.0),
        Some(ControlSample::UNTRACKED)
    );
    assert!(estimator.is_available());
}
