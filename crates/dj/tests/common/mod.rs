//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;
use twindeck_core::{JsonSettingsStore, SettingValue, SettingsError, SettingsStore};
use twindeck_dj::{
    DeckController, DeckId, EngineError, PlaybackEngine, RotationRenderer, SettingsBridge,
    SharedSettings, WaveformRenderer,
};

/// Everything the mock engine was asked to do.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub loads: Vec<PathBuf>,
    pub starts: usize,
    pub stops: usize,
    pub seeks: Vec<f64>,
    pub gains: Vec<f64>,
    pub speeds: Vec<f64>,
    pub position: Option<f64>,
    pub playing: bool,
    pub reject_loads: bool,
}

pub struct MockEngine(pub Arc<Mutex<EngineLog>>);

impl PlaybackEngine for MockEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        let mut log = self.0.lock();
        if log.reject_loads {
            return Err(EngineError::NoAudioTrack {
                path: path.to_path_buf(),
            });
        }
        log.loads.push(path.to_path_buf());
        log.position = Some(0.0);
        Ok(())
    }

    fn start(&mut self) {
        let mut log = self.0.lock();
        log.starts += 1;
        log.playing = true;
    }

    fn stop(&mut self) {
        let mut log = self.0.lock();
        log.stops += 1;
        log.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.0.lock().playing
    }

    fn position_relative(&self) -> Option<f64> {
        self.0.lock().position
    }

    fn set_position_relative(&mut self, position: f64) {
        let mut log = self.0.lock();
        log.seeks.push(position);
        log.position = Some(position);
    }

    fn set_gain(&mut self, gain: f64) {
        self.0.lock().gains.push(gain);
    }

    fn set_speed(&mut self, speed: f64) {
        self.0.lock().speeds.push(speed);
    }
}

/// What the renderers were shown.
#[derive(Debug, Default)]
pub struct ViewLog {
    pub positions: Vec<f64>,
    pub angles: Vec<f64>,
    pub sources: Vec<PathBuf>,
}

pub struct MockView(pub Arc<Mutex<ViewLog>>);

impl WaveformRenderer for MockView {
    fn set_position_relative(&mut self, position: f64) {
        self.0.lock().positions.push(position);
    }

    fn source_changed(&mut self, path: &Path) {
        self.0.lock().sources.push(path.to_path_buf());
    }
}

impl RotationRenderer for MockView {
    fn set_angle(&mut self, angle: f64) {
        twindeck_dj::view::debug_assert_angle(angle);
        self.0.lock().angles.push(angle);
    }
}

/// In-memory store that counts writes.
#[derive(Default)]
pub struct CountingStore {
    pub inner: JsonSettingsStore,
    pub sets: usize,
    pub flushes: usize,
}

impl SettingsStore for CountingStore {
    fn get(&self, section: &str, key: &str) -> Option<SettingValue> {
        self.inner.get(section, key)
    }

    fn set(&mut self, section: &str, key: &str, value: SettingValue) {
        self.sets += 1;
        self.inner.set(section, key, value);
    }

    fn flush_if_needed(&mut self) -> Result<bool, SettingsError> {
        self.flushes += 1;
        self.inner.flush_if_needed()
    }
}

impl CountingStore {
    pub fn f64(&self, deck: DeckId, key: &str) -> Option<f64> {
        self.get(&deck.settings_section(), key)
            .and_then(|v| v.as_f64())
    }

    pub fn string(&self, deck: DeckId, key: &str) -> Option<String> {
        self.get(&deck.settings_section(), key)
            .and_then(|v| v.as_str().map(str::to_string))
    }
}

/// A deck controller wired to mocks, with handles to inspect them.
pub struct Harness {
    pub engine: Arc<Mutex<EngineLog>>,
    pub view: Arc<Mutex<ViewLog>>,
    pub store: Arc<Mutex<CountingStore>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(Mutex::new(CountingStore::default())))
    }

    pub fn with_store(store: Arc<Mutex<CountingStore>>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(EngineLog::default())),
            view: Arc::new(Mutex::new(ViewLog::default())),
            store,
        }
    }

    pub fn controller(&self, id: DeckId) -> DeckController {
        let shared: SharedSettings = self.store.clone();
        DeckController::new(
            id,
            Box::new(MockEngine(self.engine.clone())),
            Box::new(MockView(self.view.clone())),
            Box::new(MockView(self.view.clone())),
            SettingsBridge::new(id, shared),
        )
    }

    /// Seed the persisted record for a deck.
    pub fn remember(&self, id: DeckId, key: &str, value: SettingValue) {
        self.store
            .lock()
            .inner
            .set(&id.settings_section(), key, value);
    }

    pub fn store_sets(&self) -> usize {
        self.store.lock().sets
    }
}

/// Create an empty file that passes the existence check.
pub fn track_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"").unwrap();
    path
}
