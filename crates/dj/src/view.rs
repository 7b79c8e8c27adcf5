//! Renderer seams for the deck visuals.

use std::f64::consts::TAU;
use std::path::Path;

/// Waveform display for one deck.
pub trait WaveformRenderer: Send {
    /// Move the playhead marker. `position` is relative (0.0 to 1.0).
    fn set_position_relative(&mut self, position: f64);

    /// A new track was loaded into the deck.
    fn source_changed(&mut self, _path: &Path) {}
}

/// Rotating platter display for one deck.
pub trait RotationRenderer: Send {
    /// `angle` must be within [0, 2π].
    fn set_angle(&mut self, angle: f64);
}

/// Check the rotation renderer precondition.
pub fn debug_assert_angle(angle: f64) {
    debug_assert!(
        (0.0..=TAU).contains(&angle),
        "rotation angle {angle} outside [0, 2π]"
    );
}

/// Renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl WaveformRenderer for NullView {
    fn set_position_relative(&mut self, _position: f64) {}
}

impl RotationRenderer for NullView {
    fn set_angle(&mut self, angle: f64) {
        debug_assert_angle(angle);
    }
}
