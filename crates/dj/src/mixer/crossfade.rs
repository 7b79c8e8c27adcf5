//! Crossfader.

use crate::deck::controls::GAIN_CONTROL_MAX;

/// Fader position at the centre of its travel.
pub const CROSSFADE_CENTRE: f64 = 15.0;

/// Anything with a gain control the crossfader can drive.
pub trait GainControl {
    fn gain(&self) -> f64;
    /// Change the gain control through its normal change path.
    fn set_gain(&mut self, value: f64);
}

/// Derives both deck gains from one fader value.
///
/// Deck A follows the fader and deck B gets the remainder, so the two gain
/// controls always sum to the full gain range.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossfadeController {
    value: f64,
}

impl Default for CrossfadeController {
    fn default() -> Self {
        Self {
            value: CROSSFADE_CENTRE,
        }
    }
}

impl CrossfadeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Move the fader. Values outside [0, 30] are passed through unchanged.
    pub fn set_fader(
        &mut self,
        value: f64,
        deck_a: &mut dyn GainControl,
        deck_b: &mut dyn GainControl,
    ) {
        self.value = value;
        deck_a.set_gain(value);
        deck_b.set_gain(GAIN_CONTROL_MAX - value);
        log::debug!("Crossfade {:.2}", value);
    }

    /// Return the fader to the centre.
    pub fn reset(&mut self, deck_a: &mut dyn GainControl, deck_b: &mut dyn GainControl) {
        self.set_fader(CROSSFADE_CENTRE, deck_a, deck_b);
    }
}
