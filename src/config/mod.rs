//! Configuration management for multipick.
//!
//! Settings are read from `config.toml` in the platform config directory.
//! A missing file yields the defaults.

mod settings;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::filter::FilterMode;

pub use settings::{FilterModeSetting, SourceSettings, WidgetSettings, DEFAULT_SOURCE_URL};

/// Default tick rate of the event loop in milliseconds.
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// Failed to create the config directory.
    #[error("Failed to create config directory: {0}")]
    CreateDirError(std::io::Error),

    /// Failed to read the config file.
    #[error("Failed to read config file: {0}")]
    ReadError(std::io::Error),

    /// Failed to write the config file.
    #[error("Failed to write config file: {0}")]
    WriteError(std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize the configuration.
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event loop tick rate in milliseconds.
    pub tick_rate_ms: u64,
    pub widget: WidgetSettings,
    pub source: SourceSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            widget: WidgetSettings::default(),
            source: SourceSettings::default(),
        }
    }
}

impl Config {
    /// Path of the default config file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("multipick").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(ConfigError::WriteError)?;
        debug!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<()> {
        if self.source.field.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "source field cannot be empty".to_string(),
            ));
        }

        if self
            .source
            .detail_field
            .as_deref()
            .is_some_and(|f| f.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "detail field cannot be empty".to_string(),
            ));
        }

        if self.source.file.is_none()
            && !self.source.url.starts_with("https://")
            && !self.source.url.starts_with("http://")
        {
            return Err(ConfigError::ValidationError(format!(
                "source URL '{}' must start with http:// or https://",
                self.source.url
            )));
        }

        if self.widget.filter_mode == FilterModeSetting::Debounced && self.widget.debounce_ms == 0 {
            return Err(ConfigError::ValidationError(
                "debounce_ms must be greater than 0 in debounced mode".to_string(),
            ));
        }

        if self.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_rate_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The filter mode the widget should run in.
    pub fn filter_mode(&self) -> FilterMode {
        match self.widget.filter_mode {
            FilterModeSetting::Sync => FilterMode::Sync,
            FilterModeSetting::Debounced => {
                FilterMode::Debounced(Duration::from_millis(self.widget.debounce_ms))
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(config.source.field, "name");
        assert_eq!(config.widget.debounce_ms, 500);
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_config_path_ends_with_app_dir() {
        let path = Config::config_path().unwrap();
        assert!(path.ends_with("multipick/config.toml"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.widget.theme = "light".to_string();
        config.widget.spinner = "simple".to_string();
        config.widget.empty_text = Some("Nobody".to_string());
        config.source.field = "species".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[widget]\nfilter_mode = \"sync\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.widget.filter_mode, FilterModeSetting::Sync);
        assert_eq!(config.filter_mode(), FilterMode::Sync);
        assert_eq!(config.source, SourceSettings::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tick_rate_ms = \"fast\"").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validate_empty_field() {
        let mut config = Config::default();
        config.source.field = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_url_scheme() {
        let mut config = Config::default();
        config.source.url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));

        // A file source makes the URL irrelevant
        config.source.file = Some(PathBuf::from("records.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_debounce() {
        let mut config = Config::default();
        config.widget.debounce_ms = 0;
        assert!(config.validate().is_err());

        config.widget.filter_mode = FilterModeSetting::Sync;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_filter_mode_debounced() {
        let mut config = Config::default();
        config.widget.debounce_ms = 250;
        assert_eq!(
            config.filter_mode(),
            FilterMode::Debounced(Duration::from_millis(250))
        );
    }
}
