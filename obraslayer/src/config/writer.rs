//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let max_entries = config
        .loader
        .max_entries
        .map(|v| v.to_string())
        .unwrap_or_default();
    let max_age = config
        .loader
        .max_age
        .map(|v| v.to_string())
        .unwrap_or_default();

    format!(
        r#"[sources]
; Base URL (http:// or https://) or local directory holding the datasets
base = {}
; Comma-separated resource keys, loaded in order
keys = {}

[loader]
; Fetch timeout in seconds
timeout = {}
; Maximum cached resources (empty = unbounded)
max_entries = {}
; Seconds before a cached resource is fetched again (empty = never)
max_age = {}

[logging]
directory = {}
file = {}
"#,
        config.sources.base,
        config.sources.keys.join(", "),
        config.loader.timeout,
        max_entries,
        max_age,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Render a path, abbreviating the home directory as `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
