//! Text renderers for the deck visuals.

use std::f64::consts::TAU;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use twindeck_dj::{view::debug_assert_angle, RotationRenderer, WaveformRenderer};

/// Last values pushed to a deck's renderers.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub position: Option<f64>,
    pub angle: f64,
}

/// Waveform and platter for one deck, drawn as a line of text on demand.
///
/// Clones share state, so one clone can be handed to the deck controller
/// while another renders the status line.
#[derive(Debug, Clone, Default)]
pub struct ConsoleView {
    state: Arc<Mutex<ViewState>>,
}

const PLATTER_GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        *self.state.lock()
    }

    /// Draw the platter glyph and a waveform bar `width` cells wide.
    pub fn render(&self, width: usize) -> String {
        let state = self.state();
        let glyph_index = ((state.angle / TAU) * PLATTER_GLYPHS.len() as f64) as usize;
        let glyph = PLATTER_GLYPHS[glyph_index % PLATTER_GLYPHS.len()];

        let mut bar = vec!['-'; width];
        if let (Some(position), Some(last)) = (state.position, width.checked_sub(1)) {
            let cell = (position * last as f64).round() as usize;
            bar[cell.min(last)] = '#';
        }

        format!("({glyph}) [{}]", bar.into_iter().collect::<String>())
    }
}

impl WaveformRenderer for ConsoleView {
    fn set_position_relative(&mut self, position: f64) {
        self.state.lock().position = Some(position);
    }

    fn source_changed(&mut self, path: &Path) {
        log::debug!("Waveform source changed to {:?}", path);
        self.state.lock().position = Some(0.0);
    }
}

impl RotationRenderer for ConsoleView {
    fn set_angle(&mut self, angle: f64) {
        debug_assert_angle(angle);
        self.state.lock().angle = angle;
    }
}
