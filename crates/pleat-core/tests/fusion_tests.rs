// Host-side tests for control fusion and the orientation stage.

use glam::Vec2;
use pleat_core::*;

fn fist() -> ControlSample {
    ControlSample {
        compression: 1.0,
        tilt_x: 0.0,
        tilt_y: 0.0,
        is_tracking: true,
    }
}

#[test]
fn smoothing_converges_geometrically() {
    let mut fusion = ControlFusion::default();
    let target = ControlSample {
        compression: 0.5,
        ..fist()
    };
    let first = fusion.update(&target, Vec2::ZERO);
    assert!((fusion.state().compression - 0.05).abs() < 1e-6);
    assert!((first.effective_compression - 0.05).abs() < 1e-6);

    let mut prev_err = 0.5 - fusion.state().compression;
    for _ in 1..60 {
        fusion.update(&target, Vec2::ZERO);
        let err = 0.5 - fusion.state().compression;
        assert!((err / prev_err - 0.9).abs() < 1e-3);
        prev_err = err;
    }
    assert!((fusion.state().compression - 0.5).abs() < 1e-3);
}

#[test]
fn max_precedence_is_monotonic_in_both_inputs() {
    for a in 0..=10 {
        for b in 0..=10 {
            let (sa, sb) = (a as f32 / 10.0, b as f32 / 10.0);
            let base = max_precedence(sa, sb);
            assert_eq!(base, sa.max(sb));
            if a < 10 {
                assert!(max_precedence(sa + 0.1, sb) >= base);
            }
            if b < 10 {
                assert!(max_precedence(sa, sb + 0.1) >= base);
            }
        }
    }
}

#[test]
fn pointer_at_edge_folds_fully_without_a_hand() {
    let mut fusion = ControlFusion::default();
    let out = fusion.update(&ControlSample::UNTRACKED, Vec2::new(1.0, 0.0));
    assert_eq!(out.effective_compression, 1.0);

    let out = fusion.update(&ControlSample::UNTRACKED, Vec2::new(-0.4, 0.0));
    assert!((out.effective_compression - 0.4).abs() < 1e-6);
}

#[test]
fn fist_is_not_flattened_by_a_centred_pointer() {
    let mut fusion = ControlFusion::default();
    let mut out = FusedControl::default();
    for _ in 0..120 {
        out = fusion.update(&fist(), Vec2::ZERO);
    }
    assert!(out.effective_compression > 0.99);

    // an open hand never unfolds a pointer-driven fold
    let open = ControlSample {
        compression: 0.0,
        ..fist()
    };
    let out = fusion.update(&open, Vec2::new(0.8, 0.0));
    assert!((out.effective_compression - 0.9).abs() < 1e-2);
    assert!(out.effective_compression >= 0.8);
}

#[test]
fn lost_hand_decays_instead_of_snapping() {
    let mut fusion = ControlFusion::default();
    let held = ControlSample {
        tilt_x: 0.8,
        tilt_y: -0.6,
        ..fist()
    };
    for _ in 0..200 {
        fusion.update(&held, Vec2::ZERO);
    }
    let mut prev = fusion.state();
    for _ in 0..10 {
        fusion.update(&ControlSample::UNTRACKED, Vec2::ZERO);
        let s = fusion.state();
        assert!(s.compression > 0.0 && s.compression < prev.compression);
        assert!((s.compression - prev.compression * 0.9).abs() < 1e-5);
        assert!((s.tilt_x - prev.tilt_x * 0.95).abs() < 1e-5);
        assert!((s.tilt_y - prev.tilt_y * 0.95).abs() < 1e-5);
        prev = s;
    }
}

#[test]
fn hand_and_pointer_tilt_add_up() {
    let mut fusion = ControlFusion::default();
    let sample = ControlSample {
        compression: 0.0,
        tilt_x: 1.0,
        tilt_y: 0.0,
        is_tracking: true,
    };
    let out = fusion.update(&sample, Vec2::new(0.5, -1.0));
    // vertical pointer -> rotation about X, horizontal -> rotation about Y
    assert!((out.tilt_x - (0.0 - 0.3)).abs() < 1e-6);
    assert!((out.tilt_y - (0.05 + 0.1)).abs() < 1e-6);
    assert!((out.effective_compression - 0.5).abs() < 1e-6);
}

#[test]
fn stale_sample_is_a_fixed_point_at_steady_state() {
    let mut fusion = ControlFusion::default();
    let sample = ControlSample {
        compression: 0.0,
        tilt_x: 0.0,
        tilt_y: 0.0,
        is_tracking: true,
    };
    let a = fusion.update(&sample, Vec2::new(0.25, 0.5));
    let b = fusion.update(&sample, Vec2::new(0.25, 0.5));
    assert_eq!(a, b);
    assert_eq!(fusion.state(), SmoothedControlState::default());
}

#[test]
fn non_finite_inputs_degrade_to_neutral() {
    let mut fusion = ControlFusion::default();
    let broken = ControlSample {
        compression: f32::NAN,
        tilt_x: f32::INFINITY,
        tilt_y: f32::NAN,
        is_tracking: true,
    };
    let out = fusion.update(&broken, Vec2::new(f32::NAN, f32::NAN));
    assert_eq!(out, FusedControl::default());
    assert_eq!(fusion.state(), SmoothedControlState::default());

    let out = fusion.update(&ControlSample::UNTRACKED, Vec2::new(3.0, -3.0));
    assert_eq!(out.effective_compression, 1.0);
    assert!((out.tilt_x + 0.3).abs() < 1e-6);
}

#[test]
fn orientation_damps_toward_half_the_tilt() {
    let mut orientation = OrientationController::default();
    let r = orientation.update(1.0, -1.0);
    assert!((r.x - 0.05).abs() < 1e-6);
    assert!((r.y + 0.05).abs() < 1e-6);

    for _ in 0..200 {
        orientation.update(1.0, -1.0);
    }
    let r = orientation.rotation();
    assert!((r.x - 0.5).abs() < 1e-4);
    assert!((r.y + 0.5).abs() < 1e-4);
}

#[test]
fn orientation_ignores_non_finite_tilt() {
    let mut orientation = OrientationController::default();
    orientation.update(0.4, 0.4);
    let before = orientation.rotation();
    let after = orientation.update(f32::NAN, f32::INFINITY);
    assert_eq!(before, after);
}

#[test]
fn neutral_orientation_is_identity() {
    let orientation = OrientationController::default();
    assert!(orientation
        .model_matrix()
        .abs_diff_eq(glam::Mat4::IDENTITY, 1e-6));
}

#[test]
fn pointer_pixels_map_to_signed_unit_square_with_y_up() {
    assert_eq!(pointer_from_pixels(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    assert_eq!(pointer_from_pixels(800.0, 0.0, 800.0, 600.0), Vec2::new(1.0, 1.0));
    assert_eq!(pointer_from_pixels(0.0, 600.0, 800.0, 600.0), Vec2::new(-1.0, -1.0));
    // outside the window clamps, degenerate surfaces centre
    assert_eq!(pointer_from_pixels(-50.0, 900.0, 800.0, 600.0), Vec2::new(-1.0, -1.0));
    assert_eq!(pointer_from_pixels(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
    assert_eq!(pointer_from_pixels(f32::NAN, 10.0, 800.0, 600.0).x, 0.0);
}

#[test]
fn pointer_state_returns_to_neutral_on_leave() {
    let mut pointer = PointerState::default();
    pointer.moved(600.0, 150.0, 800.0, 600.0);
    assert_eq!(pointer.position(), Vec2::new(0.5, 0.5));
    pointer.left();
    assert_eq!(pointer.position(), Vec2::ZERO);
    pointer.set(Vec2::new(2.0, f32::NAN));
    assert_eq!(pointer.position(), Vec2::new(1.0, 0.0));
}
