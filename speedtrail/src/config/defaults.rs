//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::tracker::{Permission, DEFAULT_BRAKE_THRESHOLD_KMH_PER_S, DEFAULT_SPEED_LIMIT_KMH};

/// Default per-position timeout (ms).
pub const DEFAULT_LOCATION_TIMEOUT_MS: u64 = 5000;

/// Default maximum cached position age (ms). Zero means always fresh.
pub const DEFAULT_MAXIMUM_AGE_MS: u64 = 0;

/// Default log file name.
pub const DEFAULT_LOG_FILE_NAME: &str = "speedtrail.log";

/// Default log file path (~/.speedtrail/speedtrail.log).
pub fn default_log_file() -> PathBuf {
    super::file::config_directory().join(DEFAULT_LOG_FILE_NAME)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            alerts: AlertSettings {
                speed_limit_kmh: DEFAULT_SPEED_LIMIT_KMH,
                brake_threshold_kmh_per_s: DEFAULT_BRAKE_THRESHOLD_KMH_PER_S,
            },
            location: LocationSettings {
                high_accuracy: true,
                timeout_ms: DEFAULT_LOCATION_TIMEOUT_MS,
                maximum_age_ms: DEFAULT_MAXIMUM_AGE_MS,
            },
            notifications: NotificationSettings {
                permission: Permission::Undetermined,
                prompt_response: Permission::Granted,
            },
            logging: LoggingSettings {
                file: default_log_file(),
                stdout: false,
            },
        }
    }
}
