//! Configuration file handling for ~/.speedtrail/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use super::settings::*;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.speedtrail/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Render as the commented INI text written by [`ConfigFile::save_to`].
    pub fn to_ini_string(&self) -> String {
        super::writer::to_config_string(self)
    }
}

/// Get the path to the config directory (~/.speedtrail).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".speedtrail")
}

/// Get the path to the config file (~/.speedtrail/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Permission;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.alerts.speed_limit_kmh, 80.0);
        assert_eq!(config.alerts.brake_threshold_kmh_per_s, 20.0);
        assert!(config.location.high_accuracy);
        assert_eq!(config.location.timeout_ms, 5000);
        assert_eq!(config.location.maximum_age_ms, 0);
        assert_eq!(config.notifications.permission, Permission::Undetermined);
        assert_eq!(config.notifications.prompt_response, Permission::Granted);
        assert!(!config.logging.stdout);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("missing.ini")).unwrap();

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.alerts.speed_limit_kmh = 110.0;
        config.alerts.brake_threshold_kmh_per_s = 12.5;
        config.location.high_accuracy = false;
        config.location.timeout_ms = 10_000;
        config.notifications.permission = Permission::Denied;
        config.logging.file = temp.path().join("drive.log");
        config.logging.stdout = true;

        config.save_to(&path).unwrap();
        let reloaded = ConfigFile::load_from(&path).unwrap();

        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[alerts]\nspeed_limit_kmh = 50\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();

        assert_eq!(config.alerts.speed_limit_kmh, 50.0);
        assert_eq!(config.alerts.brake_threshold_kmh_per_s, 20.0);
        assert_eq!(config.location, ConfigFile::default().location);
    }

    #[test]
    fn test_tracker_config_from_settings() {
        let mut config = ConfigFile::default();
        config.alerts.speed_limit_kmh = 60.0;
        config.location.timeout_ms = 2500;

        let tracker = config.tracker_config();

        assert_eq!(tracker.thresholds.speed_limit_kmh, 60.0);
        assert_eq!(tracker.watch.timeout, std::time::Duration::from_millis(2500));
    }

    #[test]
    fn test_config_paths() {
        assert!(config_file_path().ends_with(".speedtrail/config.ini"));
    }
}
