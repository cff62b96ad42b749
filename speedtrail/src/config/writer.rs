//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[alerts]
; Speed limit in km/h. Device-reported speed above this raises an alert.
speed_limit_kmh = {}
; Hard braking threshold in km/h per second, measured between consecutive fixes.
brake_threshold_kmh_per_s = {}

[location]
; Ask the location source for its most accurate positioning
high_accuracy = {}
; How long the source may take to produce one position (milliseconds)
timeout_ms = {}
; Maximum age of a cached position (milliseconds, 0 = always fresh)
maximum_age_ms = {}

[notifications]
; Permission at startup: granted, denied, or prompt
permission = {}
; Answer given when prompted for permission: granted or denied
prompt_response = {}

[logging]
; Log file path
file = {}
; Also write log output to stdout
stdout = {}
"#,
        config.alerts.speed_limit_kmh,
        config.alerts.brake_threshold_kmh_per_s,
        config.location.high_accuracy,
        config.location.timeout_ms,
        config.location.maximum_age_ms,
        config.notifications.permission,
        config.notifications.prompt_response,
        path_to_string(&config.logging.file),
        config.logging.stdout,
    )
}

/// Render a path for the config file, abbreviating the home directory as ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_has_all_sections() {
        let output = to_config_string(&ConfigFile::default());

        for section in ["[alerts]", "[location]", "[notifications]", "[logging]"] {
            assert!(output.contains(section), "missing {}", section);
        }
        assert!(output.contains("speed_limit_kmh = 80\n"));
        assert!(output.contains("brake_threshold_kmh_per_s = 20\n"));
        assert!(output.contains("permission = prompt\n"));
        assert!(output.contains("prompt_response = granted\n"));
    }

    #[test]
    fn test_output_parses_back() {
        let output = to_config_string(&ConfigFile::default());
        let ini = ini::Ini::load_from_str(&output).unwrap();

        let parsed = super::super::parser::parse_ini(&ini).unwrap();
        assert_eq!(parsed, ConfigFile::default());
    }
}
