//! Process-level lifecycle of the wall.
//!
//! `Idle -> Capturing -> Processing -> Interactive`, and `reset()` back to
//! `Idle` from anywhere. The wall (noise table and smoothed state) and the
//! attached hand-sample source only exist between capture and reset; they are
//! dropped on reset and when the session itself is dropped, so the estimator
//! behind the source is released on every exit path.

use crate::config::WallConfig;
use crate::error::WallError;
use crate::hand::ControlSample;
use crate::sample::SampleSource;
use crate::wall::{FoldWall, FrameOutput};
use glam::Vec2;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No wall exists.
    Idle,
    /// Waiting for the host to deliver a photo.
    Capturing,
    /// Wall built, short presentational delay before it reacts.
    Processing,
    /// Folding every frame.
    Interactive,
}

pub struct WallSession {
    config: WallConfig,
    phase: Phase,
    wall: Option<FoldWall>,
    source: Option<Box<dyn SampleSource>>,
    processing_elapsed: Duration,
    wall_time: Duration,
    photo_px: (u32, u32),
}

impl WallSession {
    pub fn new(config: WallConfig) -> Result<Self, WallError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Idle,
            wall: None,
            source: None,
            processing_elapsed: Duration::ZERO,
            wall_time: Duration::ZERO,
            photo_px: (0, 0),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    pub fn wall(&self) -> Option<&FoldWall> {
        self.wall.as_ref()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Elapsed wall time fed to the geometry, counted from entering `Interactive`.
    pub fn wall_time(&self) -> Duration {
        self.wall_time
    }

    /// `Idle -> Capturing`. Returns `false` from any other phase.
    pub fn begin_capture(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.set_phase(Phase::Capturing);
        true
    }

    /// `Capturing -> Processing`: build the wall for a photo of the given size.
    ///
    /// On error the session stays in `Capturing` so the host can retry.
    pub fn photo_ready(&mut self, width_px: u32, height_px: u32) -> Result<(), WallError> {
        if self.phase != Phase::Capturing {
            log::warn!("[session] photo delivered while {:?}; ignored", self.phase);
            return Ok(());
        }
        let params = self.config.params_for_photo(width_px, height_px)?;
        self.wall = Some(FoldWall::from_config(params, &self.config)?);
        self.photo_px = (width_px, height_px);
        self.processing_elapsed = Duration::ZERO;
        self.wall_time = Duration::ZERO;
        self.set_phase(Phase::Processing);
        Ok(())
    }

    /// Hand the session the estimator's output. Replaces (and drops) any
    /// previously attached source.
    pub fn attach_source(&mut self, source: Box<dyn SampleSource>) {
        self.source = Some(source);
    }

    /// Drop the attached source, releasing whatever estimator backs it.
    pub fn detach_source(&mut self) {
        if self.source.take().is_some() {
            log::info!("[session] hand source released");
        }
    }

    /// Advance session clocks. Finishes `Processing` once the configured
    /// delay has elapsed.
    pub fn tick(&mut self, dt: Duration) -> Phase {
        match self.phase {
            Phase::Processing => {
                self.processing_elapsed += dt;
                if self.processing_elapsed >= self.config.processing_delay {
                    self.set_phase(Phase::Interactive);
                }
            }
            Phase::Interactive => self.wall_time += dt,
            Phase::Idle | Phase::Capturing => {}
        }
        self.phase
    }

    /// Run one frame of the core. Only produces output while `Interactive`.
    ///
    /// Never blocks on the hand source; without one the pointer drives the
    /// wall alone.
    pub fn frame(&mut self, pointer: Vec2) -> Option<FrameOutput> {
        if self.phase != Phase::Interactive {
            return None;
        }
        let sample = self
            .source
            .as_mut()
            .map(|s| s.latest())
            .unwrap_or(ControlSample::UNTRACKED);
        let t = self.wall_time.as_secs_f32();
        self.wall.as_mut().map(|w| w.update(t, &sample, pointer))
    }

    /// Change the strip count. An existing wall is rebuilt from scratch with
    /// a fresh noise table and smoothed state.
    pub fn set_strips(&mut self, strips: usize) -> Result<(), WallError> {
        let candidate = self.config.clone().with_strips(strips);
        candidate.validate()?;
        if self.wall.is_some() {
            let (w, h) = self.photo_px;
            let params = candidate.params_for_photo(w, h)?;
            self.wall = Some(FoldWall::from_config(params, &candidate)?);
            log::info!("[session] rebuilt wall with {strips} strips");
        }
        self.config = candidate;
        Ok(())
    }

    /// Back to `Idle`, discarding the wall and releasing the hand source.
    pub fn reset(&mut self) {
        self.wall = None;
        self.detach_source();
        self.processing_elapsed = Duration::ZERO;
        self.wall_time = Duration::ZERO;
        self.photo_px = (0, 0);
        self.set_phase(Phase::Idle);
    }

    fn set_phase(&mut self, next: Phase) {
        if self.phase != next {
            log::info!("[session] {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }
}
