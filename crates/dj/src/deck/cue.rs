//! Per-deck cue point slots.

use serde::{Deserialize, Serialize};

/// Number of cue slots on each deck.
pub const CUE_SLOT_COUNT: usize = 5;

/// A single cue slot.
///
/// `value` is only meaningful while `armed`; disarming resets it to 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CuePoint {
    /// Stored relative position (0.0 to 1.0).
    pub value: f64,
    /// Mirrors the arm toggle.
    pub armed: bool,
}

/// Fixed set of cue slots owned by one deck.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuePointStore {
    slots: [CuePoint; CUE_SLOT_COUNT],
}

impl CuePointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `position` in slot `index` and arm it.
    /// Returns false (and changes nothing) for an out-of-range index.
    pub fn arm(&mut self, index: usize, position: f64) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = CuePoint {
                    value: position,
                    armed: true,
                };
                true
            }
            None => false,
        }
    }

    /// Reset slot `index` to its initial state.
    pub fn disarm(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = CuePoint::default();
                true
            }
            None => false,
        }
    }

    /// Apply the arm toggle's new state.
    pub fn set_armed(&mut self, index: usize, armed: bool, position: f64) -> bool {
        if armed {
            self.arm(index, position)
        } else {
            self.disarm(index)
        }
    }

    /// Stored position of an armed slot.
    pub fn recall(&self, index: usize) -> Option<f64> {
        self.slots
            .get(index)
            .filter(|slot| slot.armed)
            .map(|slot| slot.value)
    }

    pub fn slot(&self, index: usize) -> Option<&CuePoint> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[CuePoint; CUE_SLOT_COUNT] {
        &self.slots
    }

    /// Disarm every slot.
    pub fn clear_all(&mut self) {
        self.slots = [CuePoint::default(); CUE_SLOT_COUNT];
    }
}
