//! Deck identity, transport state and the deck snapshot.

pub mod controls;
pub mod cue;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Deck identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckId {
    One,
    Two,
}

impl DeckId {
    /// Both decks, in order.
    pub const ALL: [DeckId; 2] = [DeckId::One, DeckId::Two];

    /// Get the deck as a numeric index (0 for deck 1, 1 for deck 2).
    pub fn index(&self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// Get the user-facing deck number (1 or 2).
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }

    /// Get the deck from its user-facing number.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    /// Settings section this deck persists under.
    pub fn settings_section(&self) -> String {
        format!("deck{}", self.number())
    }
}

impl std::fmt::Display for DeckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Deck transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeckState {
    /// No track loaded.
    #[default]
    Empty,
    /// Track loaded, never started.
    Loaded,
    /// Track is playing.
    Playing,
    /// Track was playing and has been stopped.
    Stopped,
}

impl DeckState {
    /// Returns true if the deck is producing audio.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if a track is loaded.
    pub fn has_track(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Point-in-time view of a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Deck identifier.
    pub id: DeckId,
    /// Current transport state.
    pub state: DeckState,
    /// Path of the loaded (or remembered) track.
    pub file_path: Option<PathBuf>,
    /// Gain control value (0.0 to 30.0).
    pub gain: f64,
    /// Speed control value (0.0 to 2.0).
    pub speed: f64,
    /// Relative position (0.0 to 1.0), `None` before a track is loaded.
    pub position: Option<f64>,
    /// Platter rotation in radians, within [0, 2π).
    pub angle: f64,
}

impl Deck {
    /// File name of the track, for display.
    pub fn track_name(&self) -> Option<String> {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}
