//! Configuration schema types for tilemux.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the platform defaults.

mod keybinding;
mod session;
mod shell;
mod terminal;

pub use keybinding::*;
pub use session::*;
pub use shell::*;
pub use terminal::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for tilemux.
///
/// Read-only snapshot handed to the session store: shell profiles,
/// default shell, default working directory, keybinding table and
/// terminal defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilemuxConfig {
    pub shells: Vec<ShellProfile>,
    pub default_shell_id: String,
    /// Working directory for new terminals whose profile sets none.
    /// `None` falls back to the home directory.
    pub default_cwd: Option<String>,
    pub keybindings: Vec<Keybinding>,
    pub terminal: TerminalDefaults,
    pub session: SessionConfig,
}

impl Default for TilemuxConfig {
    fn default() -> Self {
        let (shells, default_shell_id) = default_shells();
        Self {
            shells,
            default_shell_id,
            default_cwd: None,
            keybindings: default_keybindings(),
            terminal: TerminalDefaults::default(),
            session: SessionConfig::default(),
        }
    }
}

impl TilemuxConfig {
    /// Look up a shell profile by id.
    pub fn find_profile(&self, id: &str) -> Option<&ShellProfile> {
        self.shells.iter().find(|s| s.id == id)
    }

    /// The profile named by `default_shell_id`, if it exists.
    pub fn default_profile(&self) -> Option<&ShellProfile> {
        self.find_profile(&self.default_shell_id)
    }

    /// Key combination bound to `action`, first match wins.
    pub fn key_for(&self, action: &str) -> Option<&str> {
        self.keybindings
            .iter()
            .find(|k| k.action == action)
            .map(|k| k.key.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_resolves_default_profile() {
        let config = TilemuxConfig::default();
        let profile = config.default_profile().unwrap();
        assert_eq!(profile.id, config.default_shell_id);
    }

    #[test]
    fn default_config_has_terminal_defaults() {
        let config = TilemuxConfig::default();
        assert_eq!(config.terminal.font_size, 14);
        assert_eq!(config.terminal.scrollback, 5000);
        assert!(config.default_cwd.is_none());
    }

    #[test]
    fn find_profile_unknown_is_none() {
        let config = TilemuxConfig::default();
        assert!(config.find_profile("tcsh").is_none());
    }

    #[test]
    fn key_for_create_terminal() {
        let config = TilemuxConfig::default();
        assert_eq!(config.key_for("createTerminal"), Some("Ctrl+Shift+N"));
        assert_eq!(config.key_for("noSuchAction"), None);
    }

    #[test]
    fn partial_toml_keeps_platform_shells() {
        let toml_str = r#"
default_cwd = "/srv/work"

[terminal]
font_size = 16
"#;
        let config: TilemuxConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_cwd.as_deref(), Some("/srv/work"));
        assert_eq!(config.terminal.font_size, 16);
        assert_eq!(config.terminal.scrollback, 5000);
        assert!(!config.shells.is_empty());
        assert!(config.default_profile().is_some());
    }

    #[test]
    fn custom_shell_list_from_toml() {
        let toml_str = r#"
default_shell_id = "nu"

[[shells]]
id = "nu"
name = "Nushell"
path = "/usr/bin/nu"
args = ["--login"]
cwd = "/tmp"

[shells.env]
NU_LOG = "info"
"#;
        let config: TilemuxConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.shells.len(), 1);
        let nu = config.default_profile().unwrap();
        assert_eq!(nu.path, "/usr/bin/nu");
        assert_eq!(nu.args, vec!["--login"]);
        assert_eq!(nu.cwd.as_deref(), Some("/tmp"));
        assert_eq!(nu.env.get("NU_LOG").map(String::as_str), Some("info"));
    }
}
