//! Playback engine interface and the headless clocked player.

mod player;

use std::path::{Path, PathBuf};

pub use player::{ClockedPlayer, PlayerState};
use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

/// Per-deck playback engine.
///
/// All calls are made from the control thread and must return promptly.
pub trait PlaybackEngine: Send {
    /// Load a track, replacing any previous one.
    fn load(&mut self, path: &Path) -> Result<(), EngineError>;
    fn start(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    /// Relative position in [0, 1]; `None` (or NaN) when nothing is loaded.
    fn position_relative(&self) -> Option<f64>;
    fn set_position_relative(&mut self, position: f64);
    /// Linear gain, nominally 0.0 to 1.0.
    fn set_gain(&mut self, gain: f64);
    /// Playback speed ratio, 1.0 is normal speed.
    fn set_speed(&mut self, speed: f64);
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to open file '{path}': {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported or corrupt audio file '{path}': {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },
    #[error("No audio track in '{path}'")]
    NoAudioTrack { path: PathBuf },
    #[error("Could not determine the duration of '{path}'")]
    UnknownDuration { path: PathBuf },
}
