//! One folding wall: fusion, geometry and orientation driven once per frame.

use crate::config::{FoldTuning, FusionTuning, OrientationTuning, WallConfig};
use crate::error::WallError;
use crate::fusion::{ControlFusion, FusedControl, SmoothedControlState};
use crate::geometry::{
    ribbon_indices, ribbon_uvs, Aabb, FoldGeometry, FoldVertexSet, StripNoiseTable, WallParams,
};
use crate::hand::ControlSample;
use crate::orientation::OrientationController;
use glam::{Vec2, Vec3};

/// What the render adapter needs besides the vertex buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameOutput {
    pub control: FusedControl,
    pub rotation: Vec2,
    pub bounds: Aabb,
}

pub struct FoldWall {
    geometry: FoldGeometry,
    fusion: ControlFusion,
    orientation: OrientationController,
    vertices: FoldVertexSet,
    indices: Vec<u32>,
    uvs: Vec<Vec2>,
    last: FrameOutput,
}

impl FoldWall {
    /// Wall with default tuning and a noise table drawn from `seed`.
    pub fn new(params: WallParams, seed: u64) -> Result<Self, WallError> {
        Self::with_noise(
            params,
            StripNoiseTable::seeded(params.strips(), seed),
            FoldTuning::default(),
            FusionTuning::default(),
            OrientationTuning::default(),
        )
    }

    pub fn from_config(params: WallParams, config: &WallConfig) -> Result<Self, WallError> {
        Self::with_noise(
            params,
            StripNoiseTable::seeded(params.strips(), config.seed),
            config.fold,
            config.fusion,
            config.orientation,
        )
    }

    pub fn with_noise(
        params: WallParams,
        noise: StripNoiseTable,
        fold: FoldTuning,
        fusion: FusionTuning,
        orientation: OrientationTuning,
    ) -> Result<Self, WallError> {
        fusion.validate()?;
        orientation.validate()?;
        let geometry = FoldGeometry::new(params, noise, fold)?;
        let vertices = geometry.generate(0.0, 0.0);
        let strips = params.strips();
        log::debug!(
            "[wall] built {}x{} with {} strips ({} vertices)",
            params.width(),
            params.height(),
            strips,
            vertices.len()
        );
        Ok(Self {
            last: FrameOutput {
                bounds: vertices.bounds(),
                ..Default::default()
            },
            geometry,
            fusion: ControlFusion::new(fusion),
            orientation: OrientationController::new(orientation),
            vertices,
            indices: ribbon_indices(strips),
            uvs: ribbon_uvs(strips),
        })
    }

    /// Run one frame: fuse inputs, regenerate all vertices, update rotation.
    ///
    /// `t` is elapsed wall time in seconds; `pointer` is in `[-1, 1]²`, Y up.
    pub fn update(&mut self, t: f32, sample: &ControlSample, pointer: Vec2) -> FrameOutput {
        let control = self.fusion.update(sample, pointer);
        self.geometry
            .generate_into(control.effective_compression, t, &mut self.vertices);
        let rotation = self.orientation.update(control.tilt_x, control.tilt_y);
        self.last = FrameOutput {
            control,
            rotation,
            bounds: self.vertices.bounds(),
        };
        self.last
    }

    pub fn last_output(&self) -> FrameOutput {
        self.last
    }

    pub fn params(&self) -> &WallParams {
        self.geometry.params()
    }

    pub fn geometry(&self) -> &FoldGeometry {
        &self.geometry
    }

    pub fn vertices(&self) -> &FoldVertexSet {
        &self.vertices
    }

    pub fn positions(&self) -> &[Vec3] {
        self.vertices.positions()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn smoothed(&self) -> SmoothedControlState {
        self.fusion.state()
    }

    pub fn rotation(&self) -> Vec2 {
        self.orientation.rotation()
    }

    pub fn orientation(&self) -> &OrientationController {
        &self.orientation
    }
}
