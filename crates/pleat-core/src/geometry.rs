//! Accordion fold geometry.
//!
//! The wall lies in its local X-Y plane and folds along X-Z: every strip is a
//! straight segment of width `width / strips` turned by its own angle, and the
//! strip boundaries are found by walking that polyline from the left edge.
//! The result is lifted into a top and a bottom row of vertices forming a
//! ribbon of `strips` quads.
//!
//! Layout of a [`FoldVertexSet`] with `n` strips: indices `0..=n` are the top
//! row (`y = +height/2`), indices `n+1..=2n+1` the bottom row, so boundary `i`
//! has its top at `i` and its bottom at `i + n + 1`.

use crate::config::FoldTuning;
use crate::constants::MAX_STRIPS;
use crate::error::WallError;
use crate::math::clamp_unit;
use glam::{Vec2, Vec3};
use rand::prelude::*;

/// Size and subdivision of one wall. Immutable for the wall's lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallParams {
    width: f32,
    height: f32,
    strips: usize,
}

impl WallParams {
    pub fn new(width: f32, height: f32, strips: usize) -> Result<Self, WallError> {
        if strips == 0 || strips > MAX_STRIPS {
            return Err(WallError::InvalidStrips {
                got: strips,
                max: MAX_STRIPS,
            });
        }
        for (name, value) in [("width", width), ("height", height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WallError::InvalidDimension { name, value });
            }
        }
        Ok(Self {
            width,
            height,
            strips,
        })
    }

    /// Keep the photo's aspect ratio at the given wall height.
    pub fn fit_to_photo(aspect: f32, height: f32, strips: usize) -> Result<Self, WallError> {
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(WallError::InvalidAspect(aspect));
        }
        Self::new(height * aspect, height, strips)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn strips(&self) -> usize {
        self.strips
    }

    /// Unfolded width of a single strip.
    pub fn segment_width(&self) -> f32 {
        self.width / self.strips as f32
    }

    pub fn vertex_count(&self) -> usize {
        2 * (self.strips + 1)
    }
}

/// Stable per-strip offsets in `[0, 1)`, drawn once per wall.
#[derive(Clone, Debug, PartialEq)]
pub struct StripNoiseTable {
    values: Vec<f32>,
}

impl StripNoiseTable {
    pub fn seeded(strips: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = (0..strips).map(|_| rng.gen::<f32>()).collect();
        Self { values }
    }

    pub fn zeros(strips: usize) -> Self {
        Self {
            values: vec![0.0; strips],
        }
    }

    pub fn from_values(values: Vec<f32>) -> Result<Self, WallError> {
        if let Some(&bad) = values.iter().find(|v| !(0.0..1.0).contains(*v)) {
            return Err(WallError::NoiseOutOfRange(bad));
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, strip: usize) -> f32 {
        self.values.get(strip).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

/// Pleats alternate sides: even strips fold forward, odd strips back.
#[inline]
pub fn fold_direction(strip: usize) -> f32 {
    if strip % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Time-based breathing offset of one strip; deterministic for a given `t`.
#[inline]
pub fn wobble(strip: usize, t: f32, tuning: &FoldTuning) -> f32 {
    (t * tuning.wobble_speed + strip as f32 * tuning.wobble_phase_step).sin()
        * tuning.wobble_amplitude
}

/// Signed fold angle of one strip, clamped to `tuning.max_angle` so that no
/// segment turns past perpendicular.
pub fn strip_angle(strip: usize, compression: f32, noise: f32, t: f32, tuning: &FoldTuning) -> f32 {
    let base = compression * tuning.compression_gain + wobble(strip, t, tuning) * tuning.wobble_weight;
    let bend = (base + noise * tuning.noise_weight * compression)
        .clamp(-tuning.max_angle, tuning.max_angle);
    fold_direction(strip) * bend
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        points.iter().skip(1).fold(
            Self {
                min: *first,
                max: *first,
            },
            |acc, p| Self {
                min: acc.min.min(*p),
                max: acc.max.max(*p),
            },
        )
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the sphere around [`Aabb::center`] enclosing the box.
    pub fn bounding_radius(&self) -> f32 {
        (self.size() * 0.5).length()
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Vertex positions of the folded ribbon, regenerated in place every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FoldVertexSet {
    strips: usize,
    positions: Vec<Vec3>,
    bounds: Aabb,
}

impl FoldVertexSet {
    /// Zeroed set sized for `strips`.
    pub fn new(strips: usize) -> Self {
        Self {
            strips,
            positions: vec![Vec3::ZERO; 2 * (strips + 1)],
            bounds: Aabb::default(),
        }
    }

    pub fn strips(&self) -> usize {
        self.strips
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn top_row(&self) -> &[Vec3] {
        &self.positions[..=self.strips]
    }

    pub fn bottom_row(&self) -> &[Vec3] {
        &self.positions[self.strips + 1..]
    }

    /// `x, y, z` triples, `2 * (strips + 1) * 3` floats, ready for upload.
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Bounds of the current frame; stale until the next regeneration.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Per-wall fold generator: parameters, noise table and tuning.
#[derive(Clone, Debug)]
pub struct FoldGeometry {
    params: WallParams,
    noise: StripNoiseTable,
    tuning: FoldTuning,
}

impl FoldGeometry {
    pub fn new(params: WallParams, noise: StripNoiseTable, tuning: FoldTuning) -> Result<Self, WallError> {
        tuning.validate()?;
        if noise.len() != params.strips() {
            return Err(WallError::NoiseTableMismatch {
                got: noise.len(),
                strips: params.strips(),
            });
        }
        Ok(Self {
            params,
            noise,
            tuning,
        })
    }

    pub fn params(&self) -> &WallParams {
        &self.params
    }

    pub fn noise(&self) -> &StripNoiseTable {
        &self.noise
    }

    pub fn tuning(&self) -> &FoldTuning {
        &self.tuning
    }

    pub fn angle(&self, strip: usize, compression: f32, t: f32) -> f32 {
        strip_angle(
            strip,
            clamp_unit(compression),
            self.noise.get(strip),
            sanitize_time(t),
            &self.tuning,
        )
    }

    pub fn generate(&self, compression: f32, t: f32) -> FoldVertexSet {
        let mut out = FoldVertexSet::new(self.params.strips());
        self.generate_into(compression, t, &mut out);
        out
    }

    /// Recompute every vertex of `out` and its bounds.
    ///
    /// Depends only on the arguments and the immutable noise table, so equal
    /// inputs give equal output.
    pub fn generate_into(&self, compression: f32, t: f32, out: &mut FoldVertexSet) {
        let n = self.params.strips();
        if out.strips != n || out.positions.len() != 2 * (n + 1) {
            *out = FoldVertexSet::new(n);
        }
        let compression = clamp_unit(compression);
        let t = sanitize_time(t);
        let seg = self.params.segment_width();
        let half_h = self.params.height() * 0.5;

        let (top, bottom) = out.positions.split_at_mut(n + 1);
        let (mut x, mut z) = (0.0_f32, 0.0_f32);
        top[0] = Vec3::new(0.0, half_h, 0.0);
        for i in 0..n {
            let angle = strip_angle(i, compression, self.noise.get(i), t, &self.tuning);
            x += seg * angle.cos();
            z += seg * angle.sin();
            top[i + 1] = Vec3::new(x, half_h, z);
        }

        // recentre so the wall stays centred however far it is compressed
        let shift = x * 0.5;
        for (upper, lower) in top.iter_mut().zip(bottom.iter_mut()) {
            upper.x -= shift;
            *lower = Vec3::new(upper.x, -half_h, upper.z);
        }
        out.bounds = Aabb::from_points(&out.positions);
    }
}

#[inline]
fn sanitize_time(t: f32) -> f32 {
    if t.is_finite() {
        t
    } else {
        0.0
    }
}

/// Triangle list for the ribbon, two counter-clockwise triangles per strip
/// (seen from +Z). Render with culling disabled for the back side.
pub fn ribbon_indices(strips: usize) -> Vec<u32> {
    let n = strips as u32;
    let mut indices = Vec::with_capacity(strips * 6);
    for i in 0..n {
        let tl = i;
        let tr = i + 1;
        let bl = i + n + 1;
        let br = i + n + 2;
        indices.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
    }
    indices
}

/// Texture coordinates matching the vertex layout; `u` runs left to right
/// across the photo, `v` is 0 on the top row and 1 on the bottom row.
pub fn ribbon_uvs(strips: usize) -> Vec<Vec2> {
    let top = (0..=strips).map(|i| Vec2::new(i as f32 / strips as f32, 0.0));
    let bottom = (0..=strips).map(|i| Vec2::new(i as f32 / strips as f32, 1.0));
    top.chain(bottom).collect()
}
