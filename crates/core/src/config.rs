use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default period of the position sync tick.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Default rotation advance per tick at speed 1.0, in radians.
pub const DEFAULT_ROTATION_STEP: f64 = 0.05;

/// Runtime configuration for the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Period of the position sync tick in milliseconds.
    pub tick_interval_ms: u64,
    /// Rotation advance per tick at speed 1.0, in radians.
    pub rotation_step: f64,
    /// Where deck settings are persisted. `None` uses the platform config dir.
    pub settings_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            rotation_step: DEFAULT_ROTATION_STEP,
            settings_path: None,
        }
    }
}

impl AppConfig {
    /// Resolve the deck settings file location.
    pub fn resolved_settings_path(&self) -> PathBuf {
        self.settings_path
            .clone()
            .unwrap_or_else(crate::settings::default_settings_path)
    }
}

/// Configuration manager for twindeck.
/// Loads and saves `AppConfig` as JSON, by default `twindeck.json` in the
/// working directory.
pub struct ConfigManager {
    config_path: PathBuf,
    config: AppConfig,
}

/// Available configuration options with validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSchema {
    pub tick_interval_ms: ConfigOption<u64>,
    pub rotation_step: ConfigOption<f64>,
}

/// Configuration option with validation and available choices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOption<T> {
    pub default: T,
    pub valid_range: Option<(T, T)>,
    pub description: String,
}

/// Persisted configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub config: AppConfig,
    pub modified_at: String,
}

impl ConfigManager {
    /// Create a new configuration manager.
    /// If no path is provided, defaults to `twindeck.json` in the current working directory.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(|| PathBuf::from("twindeck.json"));

        Self {
            config_path,
            config: AppConfig::default(),
        }
    }

    /// Load the configuration file.
    /// A missing file yields the defaults without creating anything on disk.
    pub fn load(&mut self) -> Result<AppConfig, ConfigError> {
        if !self.config_path.exists() {
            log::debug!(
                "No config file at {:?}, using defaults",
                self.config_path
            );
            return Ok(self.config.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config_file: ConfigFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if config_file.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Config file version {} doesn't match application version {}",
                config_file.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        Self::validate(&config_file.config).map_err(ConfigError::ValidationError)?;

        self.config = config_file.config;
        Ok(self.config.clone())
    }

    /// Save the current configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            if parent != Path::new("") && parent != Path::new(".") {
                fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
            }
        }

        let config_file = ConfigFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: self.config.clone(),
            modified_at: chrono::Utc::now().to_rfc3339(),
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Replace the configuration after validating it, then save.
    pub fn update(&mut self, config: AppConfig) -> Result<(), ConfigError> {
        Self::validate(&config).map_err(ConfigError::ValidationError)?;
        self.config = config;
        self.save()
    }

    /// Get current configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get configuration schema with available options
    pub fn schema() -> ConfigSchema {
        ConfigSchema {
            tick_interval_ms: ConfigOption {
                default: DEFAULT_TICK_INTERVAL_MS,
                valid_range: Some((10, 1000)),
                description: "Position sync tick period in milliseconds".to_string(),
            },
            rotation_step: ConfigOption {
                default: DEFAULT_ROTATION_STEP,
                valid_range: Some((0.0, std::f64::consts::PI)),
                description: "Platter rotation per tick at normal speed, in radians".to_string(),
            },
        }
    }

    /// Validate a configuration against the schema
    pub fn validate(config: &AppConfig) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let schema = Self::schema();

        if let Some((min, max)) = schema.tick_interval_ms.valid_range {
            if config.tick_interval_ms < min || config.tick_interval_ms > max {
                errors.push(format!(
                    "tick_interval_ms must be between {} and {}",
                    min, max
                ));
            }
        }

        if let Some((min, max)) = schema.rotation_step.valid_range {
            if !(min..=max).contains(&config.rotation_step) {
                errors.push(format!("rotation_step must be between {} and {:.4}", min, max));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    ReadError(String),
    WriteError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(msg) => write!(f, "Failed to read config file: {}", msg),
            ConfigError::WriteError(msg) => write!(f, "Failed to write config file: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config file: {}", msg),
            ConfigError::SerializeError(msg) => write!(f, "Failed to serialize config: {}", msg),
            ConfigError::ValidationError(errors) => {
                write!(f, "Config validation errors: {}", errors.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_manager_new() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.json");
        let manager = ConfigManager::new(Some(config_path.clone()));

        assert_eq!(manager.config_path(), config_path);
        assert_eq!(manager.config(), &AppConfig::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("absent.json");
        let mut manager = ConfigManager::new(Some(config_path.clone()));

        let config = manager.load().unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert!(!config_path.exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("test_config.json");

        let mut manager = ConfigManager::new(Some(config_path.clone()));
        let config = AppConfig {
            tick_interval_ms: 40,
            rotation_step: 0.1,
            settings_path: Some(temp_dir.path().join("decks.json")),
        };
        manager.update(config.clone()).unwrap();

        let mut manager2 = ConfigManager::new(Some(config_path));
        let loaded = manager2.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        assert!(ConfigManager::validate(&config).is_ok());

        config.tick_interval_ms = 5;
        assert!(ConfigManager::validate(&config).is_err());

        config.tick_interval_ms = 100;
        config.rotation_step = -0.5;
        assert!(ConfigManager::validate(&config).is_err());
    }

    #[test]
    fn test_update_rejects_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new(Some(temp_dir.path().join("c.json")));

        let bad = AppConfig {
            tick_interval_ms: 0,
            ..AppConfig::default()
        };
        match manager.update(bad) {
            Err(ConfigError::ValidationError(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("c.json");
        fs::write(&config_path, "{ not json").unwrap();

        let mut manager = ConfigManager::new(Some(config_path));
        assert!(matches!(manager.load(), Err(ConfigError::ParseError(_))));
    }
}
