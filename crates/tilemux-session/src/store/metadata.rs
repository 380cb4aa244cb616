//! Tab titles and colors, directory lists and configuration edits.

use std::sync::LazyLock;

use regex::Regex;

use tilemux_common::{Event, TerminalId};
use tilemux_config::TilemuxConfig;

use super::{TerminalStore, MAX_RECENT_DIRS};
use crate::error::StoreError;

/// Paths that name a program rather than a directory. Shells sometimes
/// report these where a working directory was expected.
static EXECUTABLE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(exe|cmd|bat|com|ps1|sh|msi|dll)$")
        .expect("executable path pattern must compile")
});

static PROGRAM_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(exe|cmd|bat|com)$").expect("program suffix pattern must compile")
});

pub(crate) fn looks_executable(path: &str) -> bool {
    EXECUTABLE_PATH.is_match(path)
}

/// Program name from a shell title: its last path segment without a
/// Windows program suffix.
pub(crate) fn process_name(raw: &str) -> String {
    let separator = if raw.contains('\\') { '\\' } else { '/' };
    let segment = raw
        .rsplit(separator)
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(raw);
    PROGRAM_SUFFIX.replace(segment, "").into_owned()
}

/// Tab label for a shell title. `"vim - notes.txt"` keeps the part after
/// the last dash separator.
pub(crate) fn tab_title(raw: &str) -> String {
    let name = process_name(raw);
    let name = match raw.rsplit_once(" - ") {
        Some((_, tail)) if !tail.trim().is_empty() => tail.trim().to_string(),
        _ => name,
    };
    if name.is_empty() {
        raw.to_string()
    } else {
        name
    }
}

impl TerminalStore {
    /// Set a tab title. `custom` of `None` keeps the current custom flag.
    pub fn rename_terminal(&mut self, id: &TerminalId, title: &str, custom: Option<bool>) -> bool {
        let Some(session) = self.sessions.get_mut(id) else {
            tracing::debug!(%id, "rename_terminal: unknown terminal");
            return false;
        };
        session.title = title.to_string();
        if let Some(custom) = custom {
            session.custom_title = custom;
        }
        true
    }

    pub fn set_tab_color(&mut self, id: &TerminalId, color: Option<String>) -> bool {
        let Some(session) = self.sessions.get_mut(id) else {
            tracing::debug!(%id, "set_tab_color: unknown terminal");
            return false;
        };
        session.tab_color = color;
        true
    }

    /// Command written to the shell when this session is restored.
    pub fn set_startup_command(&mut self, id: &TerminalId, command: &str) -> bool {
        let Some(session) = self.sessions.get_mut(id) else {
            tracing::debug!(%id, "set_startup_command: unknown terminal");
            return false;
        };
        session.startup_command = command.to_string();
        true
    }

    /// A shell announced a new window title.
    ///
    /// Tracks the running program, and renames the tab unless the user
    /// gave it a title of their own.
    pub fn report_title(&mut self, id: &TerminalId, raw: &str) -> bool {
        if raw.is_empty() {
            return false;
        }
        let Some(session) = self.sessions.get_mut(id) else {
            tracing::debug!(%id, "report_title: unknown terminal");
            return false;
        };
        session.last_process = process_name(raw);
        if !session.custom_title {
            session.title = tab_title(raw);
        }
        true
    }

    pub fn add_favorite_dir(&mut self, dir: &str) -> bool {
        if self.favorite_dirs.iter().any(|d| d == dir) {
            return false;
        }
        self.favorite_dirs.push(dir.to_string());
        true
    }

    pub fn remove_favorite_dir(&mut self, dir: &str) -> bool {
        let before = self.favorite_dirs.len();
        self.favorite_dirs.retain(|d| d != dir);
        self.favorite_dirs.len() != before
    }

    /// Put `dir` at the front of the recent list. Program paths are
    /// refused.
    pub fn add_recent_dir(&mut self, dir: &str) -> bool {
        if looks_executable(dir) {
            tracing::debug!(dir, "add_recent_dir: not a directory");
            return false;
        }
        self.recent_dirs.retain(|d| d != dir);
        self.recent_dirs.insert(0, dir.to_string());
        self.recent_dirs.truncate(MAX_RECENT_DIRS);
        true
    }

    pub fn remove_recent_dir(&mut self, dir: &str) -> bool {
        let before = self.recent_dirs.len();
        self.recent_dirs.retain(|d| d != dir);
        self.recent_dirs.len() != before
    }

    /// Type a `cd` into the focused terminal and remember the directory.
    pub async fn cd_to_dir(&mut self, dir: &str) -> Result<bool, StoreError> {
        let Some(focused) = self.focused.clone() else {
            tracing::debug!("cd_to_dir: nothing focused");
            return Ok(false);
        };
        let line = format!("cd \"{dir}\"\r");
        self.ptys.write(&focused, line.as_bytes()).await?;
        self.add_recent_dir(dir);
        Ok(true)
    }

    /// Persist a configuration edit through the configuration source.
    pub fn update_config(&mut self, config: TilemuxConfig) -> Result<(), StoreError> {
        self.config.update(config)?;
        self.emit(Event::ConfigReloaded);
        Ok(())
    }
}
