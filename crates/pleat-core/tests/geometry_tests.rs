// Host-side tests for the fold geometry generator.

use pleat_core::*;

fn geometry(width: f32, height: f32, strips: usize, noise: StripNoiseTable, tuning: FoldTuning) -> FoldGeometry {
    let params = WallParams::new(width, height, strips).expect("valid params");
    FoldGeometry::new(params, noise, tuning).expect("valid geometry")
}

#[test]
fn vertex_count_is_two_rows_of_boundaries() {
    for strips in 1..=64 {
        let g = geometry(16.0, 10.0, strips, StripNoiseTable::seeded(strips, 7), FoldTuning::default());
        let v = g.generate(0.6, 1.25);
        assert_eq!(v.len(), 2 * (strips + 1), "strips={strips}");
        assert_eq!(v.as_flat().len(), 2 * (strips + 1) * 3);
        assert_eq!(v.top_row().len(), strips + 1);
        assert_eq!(v.bottom_row().len(), strips + 1);
    }
}

#[test]
fn flat_wall_without_wobble_is_a_straight_centred_line() {
    let strips = 8;
    let tuning = FoldTuning::default().without_wobble();
    let g = geometry(16.0, 10.0, strips, StripNoiseTable::zeros(strips), tuning);
    for i in 0..strips {
        assert_eq!(g.angle(i, 0.0, 3.7), 0.0);
    }
    let v = g.generate(0.0, 3.7);
    let top = v.top_row();
    assert!((top[0].x + 8.0).abs() < 1e-5);
    assert!((top[strips].x - 8.0).abs() < 1e-5);
    for i in 0..=strips {
        assert_eq!(top[i].z, 0.0);
        assert!((top[i].x + top[strips - i].x).abs() < 1e-5, "not symmetric at {i}");
    }
}

#[test]
fn four_strip_scenario_at_rest() {
    let g = geometry(16.0, 10.0, 4, StripNoiseTable::seeded(4, 42), FoldTuning::default());
    let v = g.generate(0.0, 0.0);
    assert_eq!(v.len(), 10);

    let expected_x = [-8.0, -4.0, 0.0, 4.0, 8.0];
    for (p, ex) in v.top_row().iter().zip(expected_x) {
        assert_eq!(p.y, 5.0);
        assert!((p.x - ex).abs() < 1e-2, "x={} expected {}", p.x, ex);
        // only the breathing wave bends the strips at rest
        assert!(p.z.abs() < 0.05, "z={}", p.z);
    }
    for (top, bottom) in v.top_row().iter().zip(v.bottom_row()) {
        assert_eq!(bottom.y, -5.0);
        assert_eq!(bottom.x, top.x);
        assert_eq!(bottom.z, top.z);
    }

    let exact = geometry(16.0, 10.0, 4, StripNoiseTable::seeded(4, 42), FoldTuning::default().without_wobble());
    let v = exact.generate(0.0, 0.0);
    for (p, ex) in v.top_row().iter().zip(expected_x) {
        assert!((p.x - ex).abs() < 1e-5);
        assert_eq!(p.z, 0.0);
    }
}

#[test]
fn angles_never_exceed_the_fold_guard() {
    let strips = 32;
    let steep = FoldTuning {
        compression_gain: 4.0,
        noise_weight: 1.0,
        ..FoldTuning::default()
    };
    for tuning in [FoldTuning::default(), steep] {
        let g = geometry(16.0, 10.0, strips, StripNoiseTable::seeded(strips, 99), tuning);
        for c in [0.0, 0.1, 0.5, 0.9, 1.0, 1.5, -2.0, f32::NAN, f32::INFINITY] {
            for t in [0.0, 0.3, 10.0, 1234.5] {
                for i in 0..strips {
                    let a = g.angle(i, c, t);
                    assert!(a.abs() <= MAX_FOLD_ANGLE, "angle {a} at strip {i}, c={c}, t={t}");
                }
            }
        }
    }
}

#[test]
fn clamp_engages_at_exactly_the_maximum_angle() {
    let tuning = FoldTuning {
        compression_gain: 3.0,
        ..FoldTuning::default()
    };
    assert_eq!(strip_angle(0, 1.0, 0.5, 0.0, &tuning), tuning.max_angle);
    assert_eq!(strip_angle(1, 1.0, 0.5, 0.0, &tuning), -tuning.max_angle);
}

#[test]
fn pleats_alternate_and_compress_the_span() {
    let strips = 6;
    let tuning = FoldTuning::default().without_wobble();
    let g = geometry(12.0, 4.0, strips, StripNoiseTable::zeros(strips), tuning);
    for i in 0..strips {
        let a = g.angle(i, 1.0, 0.0);
        assert!((a.abs() - 1.3).abs() < 1e-6);
        assert_eq!(a.signum(), fold_direction(i));
    }
    let v = g.generate(1.0, 0.0);
    let top = v.top_row();
    let span = top[strips].x - top[0].x;
    assert!((span - 12.0 * 1.3_f32.cos()).abs() < 1e-4, "span={span}");
    assert!((top[0].x + top[strips].x).abs() < 1e-5);
    // equal and opposite neighbours return to the wall plane at every other boundary
    for i in (0..=strips).step_by(2) {
        assert!(top[i].z.abs() < 1e-5);
    }
    assert!(top[1].z > 0.0);
}

#[test]
fn noise_spreads_strips_only_when_folded() {
    let strips = 10;
    let noise = StripNoiseTable::seeded(strips, 5);
    let tuning = FoldTuning::default().without_wobble();
    let g = geometry(10.0, 5.0, strips, noise.clone(), tuning);
    for i in 0..strips {
        assert_eq!(g.angle(i, 0.0, 0.0), 0.0);
        let expected = 1.3 + noise.get(i) * 0.1;
        assert!((g.angle(i, 1.0, 0.0).abs() - expected).abs() < 1e-6);
    }
}

#[test]
fn generation_is_idempotent() {
    let strips = 20;
    let g = geometry(16.0, 10.0, strips, StripNoiseTable::seeded(strips, 3), FoldTuning::default());
    let a = g.generate(0.42, 2.5);
    let b = g.generate(0.42, 2.5);
    assert_eq!(a, b);

    let mut reused = g.generate(0.9, 11.0);
    g.generate_into(0.42, 2.5, &mut reused);
    assert_eq!(reused, a);
}

#[test]
fn generate_into_resizes_a_mismatched_buffer() {
    let g = geometry(8.0, 4.0, 5, StripNoiseTable::zeros(5), FoldTuning::default());
    let mut out = FoldVertexSet::new(2);
    g.generate_into(0.3, 0.0, &mut out);
    assert_eq!(out.strips(), 5);
    assert_eq!(out.len(), 12);
}

#[test]
fn wall_stays_centred_at_any_compression() {
    let strips = 15;
    let g = geometry(16.0, 10.0, strips, StripNoiseTable::seeded(strips, 11), FoldTuning::default());
    for step in 0..=20 {
        let c = step as f32 / 20.0;
        let v = g.generate(c, step as f32 * 0.37);
        let top = v.top_row();
        assert!((top[0].x + top[strips].x).abs() < 1e-4, "c={c}");
    }
}

#[test]
fn bounds_enclose_every_vertex() {
    let strips = 12;
    let g = geometry(16.0, 10.0, strips, StripNoiseTable::seeded(strips, 1), FoldTuning::default());
    let v = g.generate(0.8, 4.0);
    let b = v.bounds();
    assert_eq!(b.min.y, -5.0);
    assert_eq!(b.max.y, 5.0);
    for p in v.positions() {
        assert!(b.contains(*p));
    }
    assert!(b.bounding_radius() >= b.size().y * 0.5);
    assert!(b.center().x.abs() < 1e-4);
}

#[test]
fn noise_table_is_seeded_and_in_range() {
    let a = StripNoiseTable::seeded(64, 1234);
    let b = StripNoiseTable::seeded(64, 1234);
    let c = StripNoiseTable::seeded(64, 4321);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.as_slice().iter().all(|v| (0.0..1.0).contains(v)));
    assert_eq!(a.len(), 64);
}

#[test]
fn noise_table_rejects_out_of_range_values() {
    assert_eq!(
        StripNoiseTable::from_values(vec![0.2, 1.0]),
        Err(WallError::NoiseOutOfRange(1.0))
    );
    assert!(StripNoiseTable::from_values(vec![0.0, 0.5, 0.999]).is_ok());
}

#[test]
fn mismatched_noise_table_is_rejected() {
    let params = WallParams::new(4.0, 4.0, 4).unwrap();
    let err = FoldGeometry::new(params, StripNoiseTable::zeros(3), FoldTuning::default()).unwrap_err();
    assert_eq!(err, WallError::NoiseTableMismatch { got: 3, strips: 4 });
}

#[test]
fn wall_params_validation() {
    assert!(matches!(
        WallParams::new(16.0, 10.0, 0),
        Err(WallError::InvalidStrips { got: 0, .. })
    ));
    assert!(matches!(
        WallParams::new(16.0, 10.0, MAX_STRIPS + 1),
        Err(WallError::InvalidStrips { .. })
    ));
    assert!(matches!(
        WallParams::new(f32::NAN, 10.0, 4),
        Err(WallError::InvalidDimension { name: "width", .. })
    ));
    assert!(matches!(
        WallParams::new(16.0, -1.0, 4),
        Err(WallError::InvalidDimension { name: "height", .. })
    ));
    let p = WallParams::fit_to_photo(1.5, 10.0, 30).unwrap();
    assert_eq!(p.width(), 15.0);
    assert_eq!(p.segment_width(), 0.5);
    assert_eq!(p.vertex_count(), 62);
    assert!(WallParams::fit_to_photo(0.0, 10.0, 3).is_err());
}

#[test]
fn dense_walls_keep_the_layout_and_the_clamp() {
    for strips in [513, 1000, 4096] {
        assert!(WallParams::new(16.0, 10.0, strips).is_ok(), "strips={strips}");
    }
    let strips = 1000;
    let g = geometry(16.0, 10.0, strips, StripNoiseTable::seeded(strips, 11), FoldTuning::default());
    let v = g.generate(1.0, 2.0);
    assert_eq!(v.len(), 2 * (strips + 1));
    assert!(v.positions().iter().all(|p| p.is_finite()));
    for i in 0..strips {
        assert!(g.angle(i, 1.0, 2.0).abs() <= MAX_FOLD_ANGLE, "strip {i}");
    }
    let indices = ribbon_indices(strips);
    assert_eq!(indices.len(), strips * 6);
    assert_eq!(indices.iter().copied().max(), Some(2 * strips as u32 + 1));
}

#[test]
fn ribbon_topology_matches_vertex_layout() {
    let strips = 7;
    let indices = ribbon_indices(strips);
    assert_eq!(indices.len(), strips * 6);
    assert!(indices.iter().all(|&i| (i as usize) < 2 * (strips + 1)));
    assert_eq!(&indices[..6], &[0, 8, 1, 1, 8, 9]);

    let uvs = ribbon_uvs(strips);
    assert_eq!(uvs.len(), 2 * (strips + 1));
    assert_eq!(uvs[0], glam::Vec2::new(0.0, 0.0));
    assert_eq!(uvs[strips], glam::Vec2::new(1.0, 0.0));
    assert_eq!(uvs[strips + 1], glam::Vec2::new(0.0, 1.0));
}
