pub use config::{
    AppConfig, ConfigError, ConfigFile, ConfigManager, ConfigOption, ConfigSchema,
    DEFAULT_ROTATION_STEP, DEFAULT_TICK_INTERVAL_MS,
};
pub use settings::{
    default_settings_path, JsonSettingsStore, SettingValue, SettingsError, SettingsStore,
};

mod config;
pub mod settings;
