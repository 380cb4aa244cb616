//! Shell profile types and per-platform defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A launchable shell: program, arguments, extra environment and an
/// optional working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellProfile {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

impl ShellProfile {
    pub fn new(id: &str, name: &str, path: &str, args: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            env: HashMap::new(),
            cwd: None,
        }
    }
}

/// Platform shell list and the id of the default entry.
#[cfg(target_os = "windows")]
pub fn default_shells() -> (Vec<ShellProfile>, String) {
    let mut shells = Vec::new();
    let pwsh = find_pwsh();
    if let Some(path) = &pwsh {
        shells.push(ShellProfile::new("pwsh", "PowerShell 7", path, &["-NoLogo"]));
    }
    shells.push(ShellProfile::new(
        "powershell",
        "Windows PowerShell",
        r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe",
        &[],
    ));
    shells.push(ShellProfile::new("cmd", "CMD", "cmd.exe", &[]));
    shells.push(ShellProfile::new("wsl", "WSL", "wsl.exe", &[]));
    let default_id = if pwsh.is_some() { "pwsh" } else { "powershell" };
    (shells, default_id.into())
}

#[cfg(target_os = "windows")]
fn find_pwsh() -> Option<String> {
    let program_files = std::env::var("ProgramFiles").ok();
    let candidates = [
        program_files.map(|p| format!(r"{p}\PowerShell\7\pwsh.exe")),
        Some(r"C:\Program Files\PowerShell\7\pwsh.exe".to_string()),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|p| std::path::Path::new(p).exists())
}

/// Platform shell list and the id of the default entry.
#[cfg(target_os = "macos")]
pub fn default_shells() -> (Vec<ShellProfile>, String) {
    (
        vec![
            ShellProfile::new("zsh", "zsh", "/bin/zsh", &["-l"]),
            ShellProfile::new("bash", "bash", "/bin/bash", &["-l"]),
        ],
        "zsh".into(),
    )
}

/// Platform shell list and the id of the default entry.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn default_shells() -> (Vec<ShellProfile>, String) {
    (
        vec![
            ShellProfile::new("bash", "bash", "/bin/bash", &[]),
            ShellProfile::new("zsh", "zsh", "/usr/bin/zsh", &[]),
            ShellProfile::new("fish", "fish", "/usr/bin/fish", &[]),
        ],
        "bash".into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shell_id_is_in_list() {
        let (shells, default_id) = default_shells();
        assert!(shells.iter().any(|s| s.id == default_id));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_defaults() {
        let (shells, default_id) = default_shells();
        let ids: Vec<&str> = shells.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["bash", "zsh", "fish"]);
        assert_eq!(default_id, "bash");
        assert_eq!(shells[0].path, "/bin/bash");
    }

    #[test]
    fn profile_partial_toml() {
        let toml_str = r#"
id = "sh"
name = "POSIX sh"
path = "/bin/sh"
"#;
        let profile: ShellProfile = toml::from_str(toml_str).unwrap();
        assert_eq!(profile.id, "sh");
        assert!(profile.args.is_empty());
        assert!(profile.env.is_empty());
        assert!(profile.cwd.is_none());
    }

    #[test]
    fn profile_skips_empty_optionals_in_json() {
        let profile = ShellProfile::new("bash", "bash", "/bin/bash", &[]);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("\"env\""));
        assert!(!json.contains("\"cwd\""));
    }
}
