//! Per-deck view onto the shared settings store.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use twindeck_core::SettingsStore;

use crate::deck::DeckId;

/// Settings store shared by both decks.
pub type SharedSettings = Arc<Mutex<dyn SettingsStore>>;

const KEY_VOLUME: &str = "volume";
const KEY_SPEED: &str = "speed";
const KEY_POSITION: &str = "position";
const KEY_FILE_PATH: &str = "file_path";

/// Persisted record for one deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSettings {
    pub volume: f64,
    pub speed: f64,
    pub position: f64,
    /// Empty when no track has been loaded.
    pub file_path: String,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            volume: 0.0,
            speed: 1.0,
            position: 0.0,
            file_path: String::new(),
        }
    }
}

impl DeckSettings {
    /// Remembered track, if any.
    pub fn remembered_path(&self) -> Option<PathBuf> {
        if self.file_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.file_path))
        }
    }
}

/// Reads and writes one deck's record.
#[derive(Clone)]
pub struct SettingsBridge {
    deck: DeckId,
    section: String,
    store: SharedSettings,
}

impl SettingsBridge {
    pub fn new(deck: DeckId, store: SharedSettings) -> Self {
        Self {
            deck,
            section: deck.settings_section(),
            store,
        }
    }

    pub fn deck(&self) -> DeckId {
        self.deck
    }

    /// Read the record, filling absent or mistyped keys with defaults.
    pub fn load(&self) -> DeckSettings {
        let defaults = DeckSettings::default();
        let store = self.store.lock();
        DeckSettings {
            volume: store.get_f64(&self.section, KEY_VOLUME, defaults.volume),
            speed: store.get_f64(&self.section, KEY_SPEED, defaults.speed),
            position: store.get_f64(&self.section, KEY_POSITION, defaults.position),
            file_path: store.get_string(&self.section, KEY_FILE_PATH, &defaults.file_path),
        }
    }

    /// Write all four keys and flush if anything changed.
    pub fn save(&self, settings: &DeckSettings) {
        let mut store = self.store.lock();
        store.set(&self.section, KEY_VOLUME, settings.volume.into());
        store.set(&self.section, KEY_SPEED, settings.speed.into());
        store.set(&self.section, KEY_POSITION, settings.position.into());
        store.set(
            &self.section,
            KEY_FILE_PATH,
            settings.file_path.as_str().into(),
        );

        if let Err(e) = store.flush_if_needed() {
            log::warn!("Deck {}: Failed to save settings: {}", self.deck, e);
        }
    }
}
