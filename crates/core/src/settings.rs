//! Key-value settings persistence.
//!
//! Values live in named sections (one per deck) and are buffered in memory;
//! the backing file is only rewritten by [`SettingsStore::flush_if_needed`]
//! when something actually changed since the last flush.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SETTINGS_FILE_VERSION: u32 = 1;

/// A scalar or path value held by the settings store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(f64),
    Text(String),
}

impl SettingValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to access settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Sectioned key-value store with buffered writes.
pub trait SettingsStore: Send {
    /// Read a value, `None` if the key was never set.
    fn get(&self, section: &str, key: &str) -> Option<SettingValue>;

    /// Write a value into the in-memory buffer.
    fn set(&mut self, section: &str, key: &str, value: SettingValue);

    /// Persist buffered changes. Returns whether anything was written.
    fn flush_if_needed(&mut self) -> Result<bool, SettingsError>;

    /// Read a number, falling back to `default` when absent or not numeric.
    fn get_f64(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get(section, key)
            .and_then(|v| v.as_f64())
            .unwrap_or(default)
    }

    /// Read a string, falling back to `default` when absent or not text.
    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.get(section, key)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| default.to_string())
    }
}

/// On-disk layout of the settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    version: u32,
    modified_at: Option<String>,
    values: BTreeMap<String, BTreeMap<String, SettingValue>>,
}

/// Settings store backed by a JSON file (or nothing, for in-memory use).
#[derive(Debug, Default)]
pub struct JsonSettingsStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, BTreeMap<String, SettingValue>>,
    dirty: bool,
}

impl JsonSettingsStore {
    /// Open the store at `path`. A missing file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| SettingsError::Io {
                path: path.clone(),
                source,
            })?;
            let file: SettingsFile =
                serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                    path: path.clone(),
                    source,
                })?;
            log::debug!(
                "Loaded settings v{} from {:?} ({} sections)",
                file.version,
                path,
                file.values.len()
            );
            file.values
        } else {
            log::debug!("No settings file at {:?}, starting empty", path);
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path),
            values,
            dirty: false,
        })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether there are changes not yet flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn write_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if parent != Path::new("") {
                fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let file = SettingsFile {
            version: SETTINGS_FILE_VERSION,
            modified_at: Some(chrono::Utc::now().to_rfc3339()),
            values: self.values.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, section: &str, key: &str) -> Option<SettingValue> {
        self.values.get(section).and_then(|s| s.get(key)).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: SettingValue) {
        let entries = self.values.entry(section.to_string()).or_default();
        if entries.get(key) != Some(&value) {
            entries.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    fn flush_if_needed(&mut self) -> Result<bool, SettingsError> {
        if !self.dirty {
            return Ok(false);
        }

        let Some(path) = self.path.clone() else {
            self.dirty = false;
            return Ok(false);
        };

        self.write_file(&path)?;
        self.dirty = false;
        log::trace!("Settings flushed to {:?}", path);
        Ok(true)
    }
}

/// Default settings file location in the platform config directory.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("twindeck")
        .join("twindeck.settings.json")
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults_when_absent() {
        let store = JsonSettingsStore::in_memory();
        assert_eq!(store.get_f64("deck1", "speed", 1.0), 1.0);
        assert_eq!(store.get_string("deck1", "file_path", ""), "");
    }

    #[test]
    fn test_type_mismatch_falls_back() {
        let mut store = JsonSettingsStore::in_memory();
        store.set("deck1", "volume", "loud".into());
        assert_eq!(store.get_f64("deck1", "volume", 0.0), 0.0);
    }

    #[test]
    fn test_set_marks_dirty_only_on_change() {
        let mut store = JsonSettingsStore::in_memory();
        store.set("deck1", "volume", 12.0.into());
        assert!(store.is_dirty());

        store.flush_if_needed().unwrap();
        assert!(!store.is_dirty());

        store.set("deck1", "volume", 12.0.into());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_flush_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sub").join("settings.json");

        let mut store = JsonSettingsStore::open(&path).unwrap();
        store.set("deck1", "volume", 20.0.into());
        store.set("deck2", "file_path", "/music/track.mp3".into());
        assert!(store.flush_if_needed().unwrap());
        assert!(!store.flush_if_needed().unwrap());

        let reopened = JsonSettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get_f64("deck1", "volume", 0.0), 20.0);
        assert_eq!(
            reopened.get_string("deck2", "file_path", ""),
            "/music/track.mp3"
        );
        assert_eq!(reopened.get("deck2", "volume"), None);
    }

    #[test]
    fn test_in_memory_flush_writes_nothing() {
        let mut store = JsonSettingsStore::in_memory();
        store.set("deck1", "speed", 1.5.into());
        assert!(!store.flush_if_needed().unwrap());
        assert!(!store.is_dirty());
        assert!(store.path().is_none());
    }

    #[test]
    fn test_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            JsonSettingsStore::open(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
