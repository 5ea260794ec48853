use std::path::PathBuf;

use gatechat_common::PlatformError;

pub(super) const APP_NAME: &str = "gatechat";

/// Returns the platform-specific configuration directory.
///
/// - macOS: `~/Library/Application Support/gatechat`
/// - Linux: `$XDG_CONFIG_HOME/gatechat` (defaults to `~/.config/gatechat`)
/// - Windows: `%APPDATA%\gatechat`
pub fn config_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::config_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine config directory".into()))?
        .join(APP_NAME))
}

/// Returns the platform-specific data directory.
///
/// - macOS: `~/Library/Application Support/gatechat`
/// - Linux: `$XDG_DATA_HOME/gatechat` (defaults to `~/.local/share/gatechat`)
/// - Windows: `%APPDATA%\gatechat`
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine data directory".into()))?
        .join(APP_NAME))
}

/// Returns the path to the main configuration file.
pub fn config_file() -> Result<PathBuf, PlatformError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the path of the local key/value storage file.
///
/// Located at `data_dir()/local-storage.json`.
pub fn storage_file() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("local-storage.json"))
}
