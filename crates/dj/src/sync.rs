//! Position sync loop.
//!
//! On every tick the engine position is pulled and fanned out to the seek
//! control, the waveform and the platter. The seek control is written through
//! its silent entry point, so a tick never seeks the engine or touches the
//! settings store.

use std::f64::consts::TAU;

use crate::deck::controls::SeekControl;
use crate::engine::PlaybackEngine;
use crate::view::{RotationRenderer, WaveformRenderer};

/// Default platter advance per tick at speed 1.0, in radians.
pub const DEFAULT_ROTATION_STEP: f64 = 0.05;

/// Values published by one sync tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncFrame {
    /// Clamped relative position.
    pub position: f64,
    /// Platter angle in [0, 2π).
    pub angle: f64,
}

/// Per-deck sync state.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSyncLoop {
    angle: f64,
    step: f64,
}

impl Default for PositionSyncLoop {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_STEP)
    }
}

impl PositionSyncLoop {
    pub fn new(step: f64) -> Self {
        Self { angle: 0.0, step }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Run one tick. Returns `None` when the engine has no position.
    pub fn tick(
        &mut self,
        engine: &dyn PlaybackEngine,
        speed: f64,
        seek: &mut SeekControl,
        waveform: &mut dyn WaveformRenderer,
        rotation: &mut dyn RotationRenderer,
    ) -> Option<SyncFrame> {
        let position = engine.position_relative().filter(|p| !p.is_nan())?;
        let position = position.clamp(0.0, 1.0);

        if engine.is_playing() {
            self.angle = (self.angle + speed * self.step).rem_euclid(TAU);
        }

        seek.synced_position_update(position);
        waveform.set_position_relative(position);
        rotation.set_angle(self.angle);

        let frame = SyncFrame {
            position,
            angle: self.angle,
        };
        log::trace!("sync frame {:?}", frame);
        Some(frame)
    }
}
