//! Configuration for speedtrail.
//!
//! User settings live in `~/.speedtrail/config.ini`:
//!
//! ```ini
//! [alerts]
//! speed_limit_kmh = 80
//! brake_threshold_kmh_per_s = 20
//!
//! [location]
//! high_accuracy = true
//! timeout_ms = 5000
//! maximum_age_ms = 0
//!
//! [notifications]
//! permission = prompt
//! prompt_response = granted
//!
//! [logging]
//! file = ~/.speedtrail/speedtrail.log
//! stdout = false
//! ```
//!
//! A missing file or missing key falls back to the defaults above.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_log_file, DEFAULT_LOCATION_TIMEOUT_MS, DEFAULT_LOG_FILE_NAME, DEFAULT_MAXIMUM_AGE_MS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    AlertSettings, ConfigFile, LocationSettings, LoggingSettings, NotificationSettings,
};
