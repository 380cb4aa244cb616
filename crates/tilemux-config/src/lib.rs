//! Tilemux configuration system.
//!
//! Provides TOML-based configuration for shell profiles, terminal
//! defaults, keybindings and session persistence. All sections use
//! sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tilemux_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("default shell: {}", config.default_shell_id);
//! ```

pub mod keybinds;
pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use schema::{
    default_keybindings, Keybinding, SessionConfig, ShellProfile, TerminalDefaults,
    TilemuxConfig, CONFIG_SCHEMA_VERSION,
};
pub use toml_writer::{save_config, save_config_to_path};

use std::path::Path;
use tilemux_common::ConfigError;

/// Load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creates a default
/// if none exists, and validates the result.
pub fn load_config() -> Result<TilemuxConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path (`--config`).
///
/// Unlike [`load_config`], a missing file is an error rather than a
/// prompt to write defaults.
pub fn load_config_from(path: &Path) -> Result<TilemuxConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = TilemuxConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: TilemuxConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.default_shell_id, config.default_shell_id);
        assert_eq!(parsed.shells.len(), config.shells.len());
        assert_eq!(parsed.terminal.font_size, 14);
    }

    #[test]
    fn load_config_from_missing_path_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[terminal]\nfont_size = 99\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_config_from_accepts_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nautosave_interval_secs = 30\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.session.autosave_interval_secs, 30);
        assert!(config.session.restore_on_startup);
    }
}
