//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! Missing sections and keys keep their defaults.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::tracker::Permission;

/// Parse an `Ini` object into a `ConfigFile`.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [alerts] section
    if let Some(section) = ini.section(Some("alerts")) {
        if let Some(v) = section.get("speed_limit_kmh") {
            config.alerts.speed_limit_kmh =
                parse_positive_f64(v, "alerts", "speed_limit_kmh", "km/h")?;
        }
        if let Some(v) = section.get("brake_threshold_kmh_per_s") {
            config.alerts.brake_threshold_kmh_per_s =
                parse_positive_f64(v, "alerts", "brake_threshold_kmh_per_s", "km/h per second")?;
        }
    }

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = section.get("high_accuracy") {
            config.location.high_accuracy = parse_bool(v);
        }
        if let Some(v) = section.get("timeout_ms") {
            config.location.timeout_ms =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "location".to_string(),
                    key: "timeout_ms".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer (milliseconds)".to_string(),
                })?;
        }
        if let Some(v) = section.get("maximum_age_ms") {
            config.location.maximum_age_ms =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "location".to_string(),
                    key: "maximum_age_ms".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative integer (milliseconds)".to_string(),
                })?;
        }
    }

    // [notifications] section
    if let Some(section) = ini.section(Some("notifications")) {
        if let Some(v) = section.get("permission") {
            config.notifications.permission = parse_permission(v).ok_or_else(|| {
                ConfigFileError::InvalidValue {
                    section: "notifications".to_string(),
                    key: "permission".to_string(),
                    value: v.to_string(),
                    reason: "must be one of: granted, denied, prompt".to_string(),
                }
            })?;
        }
        if let Some(v) = section.get("prompt_response") {
            config.notifications.prompt_response = match parse_permission(v) {
                Some(p @ (Permission::Granted | Permission::Denied)) => p,
                _ => {
                    return Err(ConfigFileError::InvalidValue {
                        section: "notifications".to_string(),
                        key: "prompt_response".to_string(),
                        value: v.to_string(),
                        reason: "must be one of: granted, denied".to_string(),
                    })
                }
            };
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("stdout") {
            config.logging.stdout = parse_bool(v);
        }
    }

    Ok(config)
}

fn parse_positive_f64(
    value: &str,
    section: &str,
    key: &str,
    unit: &str,
) -> Result<f64, ConfigFileError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("must be a positive number ({})", unit),
        })
}

/// Parse a permission name. `prompt` and `undetermined` are synonyms.
pub(super) fn parse_permission(value: &str) -> Option<Permission> {
    match value.trim().to_lowercase().as_str() {
        "granted" => Some(Permission::Granted),
        "denied" => Some(Permission::Denied),
        "prompt" | "undetermined" => Some(Permission::Undetermined),
        _ => None,
    }
}

/// Parse boolean from string (true/false, 1/0, yes/no, on/off).
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
