//! Twindeck DJ engine
//!
//! Two-deck playback control: per-deck transport, gain, speed and seek
//! controls, five cue points per deck, a crossfader coupling the two deck
//! gains, and a sync loop that keeps the engine position, the seek control
//! and the deck visuals consistent.
//!
//! # Features
//!
//! - Headless clocked playback engine with symphonia track probing
//! - Cue point arming and recall
//! - Crossfade law `gain(1) + gain(2) == 30`, deck 2 follows the fader
//! - Per-deck settings persisted through a shared settings store
//! - Text command parsing for console front ends

pub mod command;
pub mod controller;
pub mod deck;
pub mod engine;
pub mod mixer;
pub mod settings;
pub mod sync;
pub mod view;

// Re-export main types
pub use command::{Command, ParseCommandError};
pub use controller::{DeckController, LoadOutcome};
pub use deck::controls::{SeekControl, GAIN_CONTROL_MAX, SPEED_CONTROL_MAX};
pub use deck::cue::{CuePoint, CuePointStore, CUE_SLOT_COUNT};
pub use deck::{Deck, DeckId, DeckState};
pub use engine::{ClockedPlayer, EngineError, PlaybackEngine, PlayerState};
pub use mixer::{CommandOutcome, CrossfadeController, GainControl, Mixer};
pub use settings::{DeckSettings, SettingsBridge, SharedSettings};
pub use sync::{PositionSyncLoop, SyncFrame};
pub use view::{NullView, RotationRenderer, WaveformRenderer};
