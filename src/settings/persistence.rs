//! Reading and writing [`Settings`] as a JSON file.

use anyhow::{Context, Result};
use log::{info, warn};
use std::io::ErrorKind;
use std::path::Path;

use super::Settings;

/// Load settings from `path`.
///
/// A missing file yields defaults. A file that cannot be read or parsed is
/// reported and also replaced by defaults; preferences are never fatal.
pub fn load_settings(path: &Path) -> Settings {
    match try_load(path) {
        Ok(Some(settings)) => {
            info!("loaded settings from {:?}", path);
            settings
        }
        Ok(None) => Settings::default(),
        Err(err) => {
            warn!("ignoring settings file: {:#}", err);
            Settings::default()
        }
    }
}

fn try_load(path: &Path) -> Result<Option<Settings>> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read settings from {:?}", path));
        }
    };

    let settings: Settings = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse settings in {:?}", path))?;

    Ok(Some(settings.clamped()))
}

/// Write settings to `path` as pretty JSON, creating parent directories.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write settings to {:?}", path))?;

    Ok(())
}
