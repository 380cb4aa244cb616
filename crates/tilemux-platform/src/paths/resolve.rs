use std::path::PathBuf;

use tilemux_common::PlatformError;

pub(super) const APP_NAME: &str = "tilemux";

/// Returns the platform-specific configuration directory for tilemux.
///
/// - macOS: `~/Library/Application Support/tilemux`
/// - Linux: `$XDG_CONFIG_HOME/tilemux` (defaults to `~/.config/tilemux`)
/// - Windows: `%APPDATA%\tilemux`
pub fn config_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::config_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine config directory".into()))?
        .join(APP_NAME))
}

/// Returns the platform-specific data directory for tilemux.
///
/// - macOS: `~/Library/Application Support/tilemux`
/// - Linux: `$XDG_DATA_HOME/tilemux` (defaults to `~/.local/share/tilemux`)
/// - Windows: `%APPDATA%\tilemux`
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine data directory".into()))?
        .join(APP_NAME))
}

/// Returns the path to the main configuration file (`config_dir()/config.toml`).
pub fn config_file() -> Result<PathBuf, PlatformError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the path to the persisted session document (`data_dir()/session.json`).
///
/// Holds the autosaved layout, named layouts, and directory lists.
pub fn session_file() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("session.json"))
}
