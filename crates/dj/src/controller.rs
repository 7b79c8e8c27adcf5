//! Deck controller.
//!
//! Owns one deck's engine, renderers, cue slots and sync loop, and applies
//! user commands to them. Every user-initiated control change goes through
//! one path: update the control, push to the engine, persist the record.

use std::path::{Path, PathBuf};

use crate::deck::controls::{
    engine_gain, SeekControl, GAIN_CONTROL_RESET, SPEED_CONTROL_RESET,
};
use crate::deck::cue::{CuePoint, CuePointStore, CUE_SLOT_COUNT};
use crate::deck::{Deck, DeckId, DeckState};
use crate::engine::PlaybackEngine;
use crate::mixer::GainControl;
use crate::settings::{DeckSettings, SettingsBridge};
use crate::sync::{PositionSyncLoop, SyncFrame};
use crate::view::{RotationRenderer, WaveformRenderer};

/// Result of a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The track was loaded.
    Loaded,
    /// The file is missing or the engine rejected it.
    Failed,
    /// No path to load; the caller should ask the user for one.
    NeedsPath,
}

pub struct DeckController {
    id: DeckId,
    state: DeckState,
    /// Current track path. Starts as the remembered path from settings.
    file_path: Option<PathBuf>,
    gain: f64,
    speed: f64,
    seek: SeekControl,
    cues: CuePointStore,
    sync: PositionSyncLoop,
    engine: Box<dyn PlaybackEngine>,
    waveform: Box<dyn WaveformRenderer>,
    rotation: Box<dyn RotationRenderer>,
    settings: SettingsBridge,
    /// Cleared by the first load request.
    initial_load_pending: bool,
}

impl DeckController {
    /// Create a controller and silently restore the persisted record.
    pub fn new(
        id: DeckId,
        mut engine: Box<dyn PlaybackEngine>,
        waveform: Box<dyn WaveformRenderer>,
        rotation: Box<dyn RotationRenderer>,
        settings: SettingsBridge,
    ) -> Self {
        let record = settings.load();
        log::debug!("Deck {}: Restored settings {:?}", id, record);

        engine.set_gain(engine_gain(record.volume));
        engine.set_speed(record.speed);

        Self {
            id,
            state: DeckState::Empty,
            file_path: record.remembered_path(),
            gain: record.volume,
            speed: record.speed,
            seek: SeekControl::new(record.position),
            cues: CuePointStore::new(),
            sync: PositionSyncLoop::default(),
            engine,
            waveform,
            rotation,
            settings,
            initial_load_pending: true,
        }
    }

    /// Use a different platter step per tick.
    pub fn with_rotation_step(mut self, step: f64) -> Self {
        self.sync = PositionSyncLoop::new(step);
        self
    }

    /// Deck this controller drives.
    pub fn id(&self) -> DeckId {
        self.id
    }

    /// Current transport state.
    pub fn state(&self) -> DeckState {
        self.state
    }

    /// Gain control value (0.0 to 30.0).
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Speed control value (0.0 to 2.0).
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Seek control value, as last set by the user or the sync loop.
    pub fn seek_value(&self) -> f64 {
        self.seek.value()
    }

    /// Loaded track, or the remembered one before the first load.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// File name of the current track, for labels.
    pub fn track_name(&self) -> Option<String> {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// All cue slots, in order.
    pub fn cue_points(&self) -> &[CuePoint; CUE_SLOT_COUNT] {
        self.cues.slots()
    }

    /// Load `path` if it exists and the engine accepts it.
    ///
    /// On failure nothing about the deck changes.
    pub fn load_file(&mut self, path: &Path) -> bool {
        if !path.is_file() {
            log::warn!("Deck {}: File not found: {:?}", self.id, path);
            return false;
        }

        if let Err(e) = self.engine.load(path) {
            log::warn!("Deck {}: Failed to load {:?}: {}", self.id, path, e);
            return false;
        }

        self.file_path = Some(path.to_path_buf());
        self.state = DeckState::Loaded;
        self.waveform.source_changed(path);
        log::info!(
            "Deck {}: Loaded {}",
            self.id,
            self.track_name().unwrap_or_default()
        );
        true
    }

    /// Handle a load request.
    ///
    /// The first request without a selection reloads the remembered track;
    /// after that a request without a selection needs a path from the user.
    pub fn load(&mut self, selection: Option<PathBuf>) -> LoadOutcome {
        let initial = std::mem::replace(&mut self.initial_load_pending, false);

        let path = match selection {
            Some(path) => path,
            None if initial => match self.file_path.clone() {
                Some(path) => path,
                None => return LoadOutcome::NeedsPath,
            },
            None => return LoadOutcome::NeedsPath,
        };

        if self.load_file(&path) {
            LoadOutcome::Loaded
        } else {
            LoadOutcome::Failed
        }
    }

    /// Handle files dropped onto the deck. Only a single file is accepted.
    pub fn drop_files(&mut self, paths: &[PathBuf]) -> bool {
        let [path] = paths else {
            log::debug!(
                "Deck {}: Ignoring drop of {} files",
                self.id,
                paths.len()
            );
            return false;
        };

        let loaded = self.load_file(path);
        self.persist();
        loaded
    }

    /// Start playback. Ignored when nothing is loaded.
    pub fn play(&mut self) -> bool {
        if !self.state.has_track() {
            log::debug!("Deck {}: Nothing loaded, ignoring play", self.id);
            return false;
        }

        self.engine.set_gain(engine_gain(self.gain));
        self.engine.set_speed(self.speed);
        self.engine.start();
        self.state = DeckState::Playing;
        log::info!("Deck {} playing", self.id);
        true
    }

    /// Stop playback, keeping the position. Ignored unless playing.
    pub fn stop(&mut self) -> bool {
        if self.state != DeckState::Playing {
            return false;
        }

        self.engine.stop();
        self.state = DeckState::Stopped;
        log::info!("Deck {} stopped", self.id);
        true
    }

    /// Set the gain control; the engine gets `value / 30`.
    pub fn set_gain(&mut self, value: f64) {
        self.gain = value;
        self.engine.set_gain(engine_gain(value));
        log::debug!("Deck {}: Gain {:.2}", self.id, value);
        self.persist();
    }

    /// Set the speed control and the engine speed ratio.
    pub fn set_speed(&mut self, value: f64) {
        self.speed = value;
        self.engine.set_speed(value);
        log::debug!("Deck {}: Speed {:.2}", self.id, value);
        self.persist();
    }

    /// User-initiated seek: moves the engine and persists.
    pub fn external_seek(&mut self, position: f64) {
        self.seek.user_set(position);
        self.engine.set_position_relative(position);
        log::debug!("Deck {}: Seek {:.3}", self.id, position);
        self.persist();
    }

    /// Return the gain control to the centre of its range.
    pub fn reset_gain(&mut self) {
        self.set_gain(GAIN_CONTROL_RESET);
    }

    /// Return the speed control to normal speed.
    pub fn reset_speed(&mut self) {
        self.set_speed(SPEED_CONTROL_RESET);
    }

    /// Apply a cue toggle. Arming stores the current seek position.
    pub fn set_cue_armed(&mut self, index: usize, armed: bool) -> bool {
        let applied = self.cues.set_armed(index, armed, self.seek.value());
        if !applied {
            log::debug!("Deck {}: Invalid cue index {}", self.id, index);
        }
        applied
    }

    /// Seek to an armed cue. Unarmed or invalid slots are ignored.
    pub fn recall_cue(&mut self, index: usize) -> bool {
        match self.cues.recall(index) {
            Some(position) => {
                self.external_seek(position);
                true
            }
            None => {
                log::debug!("Deck {}: Cue {} not armed", self.id, index);
                false
            }
        }
    }

    /// Disarm every cue slot.
    pub fn clear_cues(&mut self) {
        self.cues.clear_all();
        log::debug!("Deck {}: Cleared cue points", self.id);
    }

    /// Run one sync tick.
    ///
    /// A deck whose engine ran off the end of the track moves to `Stopped`.
    pub fn tick(&mut self) -> Option<SyncFrame> {
        if self.state == DeckState::Playing && !self.engine.is_playing() {
            self.state = DeckState::Stopped;
            log::info!("Deck {} reached end of track", self.id);
        }

        self.sync.tick(
            self.engine.as_ref(),
            self.speed,
            &mut self.seek,
            self.waveform.as_mut(),
            self.rotation.as_mut(),
        )
    }

    /// Point-in-time view of the deck.
    pub fn snapshot(&self) -> Deck {
        Deck {
            id: self.id,
            state: self.state,
            file_path: self.file_path.clone(),
            gain: self.gain,
            speed: self.speed,
            position: self
                .engine
                .position_relative()
                .filter(|p| !p.is_nan())
                .map(|p| p.clamp(0.0, 1.0)),
            angle: self.sync.angle(),
        }
    }

    fn record(&self) -> DeckSettings {
        DeckSettings {
            volume: self.gain,
            speed: self.speed,
            position: self.seek.value(),
            file_path: self
                .file_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    fn persist(&self) {
        self.settings.save(&self.record());
    }
}

impl GainControl for DeckController {
    fn gain(&self) -> f64 {
        self.gain
    }

    fn set_gain(&mut self, value: f64) {
        DeckController::set_gain(self, value);
    }
}
