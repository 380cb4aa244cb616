//! Creating and destroying sessions, and PTY traffic.

use tilemux_common::{Event, TerminalId, TerminalMode};
use tilemux_config::{ShellProfile, TilemuxConfig};
use tilemux_pty::{PtyEvent, PtySpawnRequest, SpawnedPty, DEFAULT_COLS, DEFAULT_ROWS};
use tilemux_tiling::{Axis, Side};

use super::{TerminalSession, TerminalStore};
use crate::error::StoreError;

/// Working directory for a new shell: the profile's, else the configured
/// default, else the home directory.
pub(crate) fn default_cwd(config: &TilemuxConfig, profile: &ShellProfile) -> String {
    profile
        .cwd
        .iter()
        .chain(config.default_cwd.iter())
        .find(|dir| !dir.is_empty())
        .cloned()
        .or_else(|| dirs::home_dir().map(|home| home.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "/".to_string())
}

impl TerminalStore {
    /// Spawn a shell with `profile` (the default profile when `None`) and
    /// tile it after the last pane.
    ///
    /// Returns `Ok(None)` when no config is loaded or the profile is
    /// unknown. A spawn failure registers nothing.
    pub async fn create_terminal(
        &mut self,
        profile: Option<&str>,
    ) -> Result<Option<TerminalId>, StoreError> {
        let Some(config) = self.config.config() else {
            tracing::debug!("create_terminal: no configuration loaded");
            return Ok(None);
        };
        let profile_id = profile.unwrap_or(&config.default_shell_id);
        let Some(profile) = config.find_profile(profile_id) else {
            tracing::debug!(profile = profile_id, "create_terminal: unknown shell profile");
            return Ok(None);
        };

        let id = TerminalId::new();
        let cwd = default_cwd(&config, profile);
        let spawned = self.spawn_shell(&id, profile, &cwd).await?;

        self.register(TerminalSession::tiled(
            id.clone(),
            &profile.name,
            &profile.id,
            cwd,
            spawned.pid,
        ));
        self.append_tiled(id.clone());
        self.set_focused(Some(id.clone()));
        self.emit(Event::LayoutChanged);
        tracing::info!(%id, profile = %profile.id, "terminal created");
        Ok(Some(id))
    }

    /// Split `target` along `axis`, starting a shell with the same profile
    /// and working directory. `side` defaults to right for horizontal
    /// splits and bottom for vertical ones.
    pub async fn split_terminal(
        &mut self,
        target: &TerminalId,
        axis: Axis,
        side: Option<Side>,
    ) -> Result<Option<TerminalId>, StoreError> {
        let Some(config) = self.config.config() else {
            tracing::debug!("split_terminal: no configuration loaded");
            return Ok(None);
        };
        if !self.tree.contains(target) {
            tracing::debug!(%target, "split_terminal: target is not tiled");
            return Ok(None);
        }
        let Some(source) = self.sessions.get(target) else {
            return Ok(None);
        };
        let Some(profile) = config.find_profile(&source.shell_profile_id) else {
            tracing::debug!(profile = %source.shell_profile_id, "split_terminal: unknown shell profile");
            return Ok(None);
        };
        let cwd = source.cwd.clone();

        let id = TerminalId::new();
        let spawned = self.spawn_shell(&id, profile, &cwd).await?;

        self.register(TerminalSession::tiled(
            id.clone(),
            &profile.name,
            &profile.id,
            cwd,
            spawned.pid,
        ));
        let side = side.unwrap_or_else(|| Side::default_for(axis));
        self.tree.insert_leaf(target, id.clone(), side);
        self.set_focused(Some(id.clone()));
        self.emit(Event::LayoutChanged);
        tracing::info!(%id, %target, ?side, "terminal split");
        Ok(Some(id))
    }

    /// Kill the shell and forget the session. Returns `false` for unknown ids.
    pub async fn close_terminal(&mut self, id: &TerminalId) -> bool {
        let Some(mode) = self.mode_of(id) else {
            tracing::debug!(%id, "close_terminal: unknown terminal");
            return false;
        };
        self.take_out_of_layout(id, mode);
        if let Err(e) = self.ptys.kill(id).await {
            tracing::warn!(%id, error = %e, "failed to kill pty");
        }
        self.unregister(id);
        tracing::info!(%id, "terminal closed");
        true
    }

    /// Apply a PTY event. An exit removes the session the same way a close
    /// does, minus the kill. Output needs no store changes.
    pub fn handle_pty_event(&mut self, event: &PtyEvent) -> bool {
        match event {
            PtyEvent::Data { .. } => false,
            PtyEvent::Exit { id, exit_code } => {
                let Some(mode) = self.mode_of(id) else {
                    tracing::debug!(%id, "exit for unknown terminal");
                    return false;
                };
                self.take_out_of_layout(id, mode);
                self.unregister(id);
                self.emit(Event::TerminalExited {
                    id: id.clone(),
                    exit_code: *exit_code,
                });
                tracing::info!(%id, ?exit_code, "shell exited");
                true
            }
        }
    }

    /// Send input to a terminal's shell. Unknown ids are a no-op.
    pub async fn write_terminal(&self, id: &TerminalId, data: &[u8]) -> Result<bool, StoreError> {
        if !self.sessions.contains_key(id) {
            tracing::debug!(%id, "write_terminal: unknown terminal");
            return Ok(false);
        }
        self.ptys.write(id, data).await?;
        Ok(true)
    }

    pub async fn resize_terminal(
        &self,
        id: &TerminalId,
        cols: u16,
        rows: u16,
    ) -> Result<bool, StoreError> {
        if !self.sessions.contains_key(id) {
            tracing::debug!(%id, "resize_terminal: unknown terminal");
            return Ok(false);
        }
        self.ptys.resize(id, cols, rows).await?;
        Ok(true)
    }

    pub(crate) async fn spawn_shell(
        &self,
        id: &TerminalId,
        profile: &ShellProfile,
        cwd: &str,
    ) -> Result<SpawnedPty, StoreError> {
        let request = PtySpawnRequest {
            id: id.clone(),
            shell_path: profile.path.clone(),
            args: profile.args.clone(),
            cwd: cwd.to_string(),
            env: profile.env.clone(),
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        };
        self.ptys.create(request).await.map_err(|e| {
            tracing::warn!(%id, shell = %profile.path, error = %e, "failed to spawn shell");
            StoreError::Spawn(e)
        })
    }

    /// Whether `id` currently has a pane in the main window.
    pub fn is_visible(&self, id: &TerminalId) -> bool {
        self.mode_of(id).is_some_and(TerminalMode::is_visible)
    }
}
