use mxl2dnm_ports::settings::{ConvertSettings, SettingsError};
use std::fs;
use std::path::Path;

/// Reads settings from a JSON file; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<ConvertSettings, SettingsError> {
    if !path.exists() {
        return Ok(ConvertSettings::default());
    }
    let data = fs::read(path).map_err(|e| SettingsError::Io(e.to_string()))?;
    serde_json::from_slice(&data).map_err(|e| SettingsError::Serde(e.to_string()))
}

pub fn save_settings(path: &Path, settings: &ConvertSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SettingsError::Io(e.to_string()))?;
    }
    let data =
        serde_json::to_vec_pretty(settings).map_err(|e| SettingsError::Serde(e.to_string()))?;
    fs::write(path, data).map_err(|e| SettingsError::Io(e.to_string()))
}
