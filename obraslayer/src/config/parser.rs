//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [sources] section
    if let Some(section) = ini.section(Some("sources")) {
        if let Some(v) = section.get("base") {
            let v = v.trim();
            if !v.is_empty() {
                config.sources.base = v.to_string();
            }
        }
        if let Some(v) = section.get("keys") {
            let keys = parse_list(v);
            if keys.is_empty() {
                return Err(invalid("sources", "keys", v, "at least one resource key is required"));
            }
            config.sources.keys = keys;
        }
    }

    // [loader] section
    if let Some(section) = ini.section(Some("loader")) {
        if let Some(v) = section.get("timeout") {
            let timeout: u64 = parse_value("loader", "timeout", v)?;
            if timeout == 0 {
                return Err(invalid("loader", "timeout", v, "must be at least 1 second"));
            }
            config.loader.timeout = timeout;
        }
        if let Some(v) = section.get("max_entries") {
            config.loader.max_entries = parse_optional("loader", "max_entries", v)?;
        }
        if let Some(v) = section.get("max_age") {
            config.loader.max_age = parse_optional("loader", "max_age", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Splits a comma-separated list, dropping blank items.
pub(super) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
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

fn parse_value<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

/// Empty means unset.
fn parse_optional<T: FromStr>(section: &str, key: &str, value: &str) -> Result<Option<T>, ConfigFileError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_value(section, key, value).map(Some)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
