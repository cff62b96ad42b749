//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::tracker::{AlertThresholds, Permission, TrackerConfig, WatchOptions};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Alert thresholds
    pub alerts: AlertSettings,
    /// Options handed to the location source
    pub location: LocationSettings,
    /// Notification permission behavior
    pub notifications: NotificationSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Alert threshold configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertSettings {
    /// Speed limit in km/h
    pub speed_limit_kmh: f64,
    /// Hard braking threshold in km/h per second
    pub brake_threshold_kmh_per_s: f64,
}

/// Location source configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    /// Request high accuracy positioning
    pub high_accuracy: bool,
    /// Per-position timeout in milliseconds
    pub timeout_ms: u64,
    /// Maximum age of a cached position in milliseconds
    pub maximum_age_ms: u64,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    /// Permission state at startup
    pub permission: Permission,
    /// What a permission prompt resolves to (granted or denied)
    pub prompt_response: Permission,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
    /// Also log to stdout
    pub stdout: bool,
}

impl ConfigFile {
    /// Tracker configuration derived from these settings.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            thresholds: AlertThresholds {
                speed_limit_kmh: self.alerts.speed_limit_kmh,
                brake_threshold_kmh_per_s: self.alerts.brake_threshold_kmh_per_s,
            },
            watch: WatchOptions {
                high_accuracy: self.location.high_accuracy,
                timeout: std::time::Duration::from_millis(self.location.timeout_ms),
                maximum_age: std::time::Duration::from_millis(self.location.maximum_age_ms),
            },
            ..TrackerConfig::default()
        }
    }
}
