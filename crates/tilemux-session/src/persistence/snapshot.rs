//! Saving the store into a [`SessionDocument`] and rebuilding it from one.

use tilemux_common::{Event, PersistenceError, TerminalId, TerminalMode};
use tilemux_config::TilemuxConfig;
use tilemux_tiling::LayoutTree;

use super::document::{
    LayoutSnapshot, LayoutSummary, SavedPanel, SavedTerminal, SessionDocument, SnapshotNode,
    SESSION_FORMAT_VERSION,
};
use crate::error::StoreError;
use crate::store::lifecycle::default_cwd;
use crate::store::metadata::looks_executable;
use crate::store::{FloatingPanel, TerminalSession, TerminalStore, FIRST_Z_INDEX, MAX_RECENT_DIRS};

impl TerminalStore {
    /// The current tree and floating panels as restorable metadata.
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            tree: self
                .tree
                .to_shape()
                .map(|shape| SnapshotNode::capture(&shape, &self.sessions)),
            floating: self
                .floating
                .iter()
                .map(|p| SavedPanel::capture(&p.terminal_id, p.bounds(), &self.sessions))
                .collect(),
        }
    }

    pub fn document(&self) -> SessionDocument {
        let LayoutSnapshot { tree, floating } = self.snapshot();
        SessionDocument {
            version: SESSION_FORMAT_VERSION,
            tree,
            floating,
            layouts: self.layouts.clone(),
            favorite_dirs: self.favorite_dirs.clone(),
            recent_dirs: self.recent_dirs.clone(),
        }
    }

    /// Serialize the document. Cheap enough to run inside a mutation, so
    /// the actual write can happen elsewhere.
    pub fn encode_document(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(&self.document())
            .map_err(|e| PersistenceError::Format(e.to_string()))
    }

    pub async fn save_session(&self) -> Result<(), StoreError> {
        let blob = self.encode_document()?;
        self.blobs.set_blob(blob).await?;
        self.emit(Event::SessionSaved);
        Ok(())
    }

    /// Read the saved document and adopt its named layouts and directory
    /// lists. Returns the saved arrangement without starting anything.
    pub async fn load_saved_state(&mut self) -> Result<Option<LayoutSnapshot>, StoreError> {
        let Some(blob) = self.blobs.get_blob().await? else {
            return Ok(None);
        };
        let document: SessionDocument =
            serde_json::from_str(&blob).map_err(|e| PersistenceError::Format(e.to_string()))?;

        self.layouts = document.layouts;
        self.favorite_dirs = document
            .favorite_dirs
            .into_iter()
            .filter(|d| !looks_executable(d))
            .collect();
        self.recent_dirs = document
            .recent_dirs
            .into_iter()
            .filter(|d| !looks_executable(d))
            .take(MAX_RECENT_DIRS)
            .collect();

        Ok(Some(LayoutSnapshot {
            tree: document.tree,
            floating: document.floating,
        }))
    }

    /// Restore the last saved session. Returns `false` when nothing was
    /// saved or nothing could be started again.
    pub async fn restore_session(&mut self) -> Result<bool, StoreError> {
        match self.load_saved_state().await? {
            Some(snapshot) if !snapshot.is_empty() => self.replace_with(&snapshot).await,
            _ => Ok(false),
        }
    }

    /// Store the current arrangement under `name` and save.
    pub async fn save_named_layout(&mut self, name: &str) -> Result<(), StoreError> {
        self.layouts.insert(name.to_string(), self.snapshot());
        tracing::info!(name, "layout saved");
        self.save_session().await
    }

    /// Replace everything with the layout saved as `name`. Returns `false`
    /// if there is no such layout, no configuration, or nothing started.
    pub async fn load_named_layout(&mut self, name: &str) -> Result<bool, StoreError> {
        let Some(snapshot) = self.layouts.get(name).cloned() else {
            tracing::debug!(name, "load_named_layout: unknown layout");
            return Ok(false);
        };
        let loaded = self.replace_with(&snapshot).await?;
        tracing::info!(name, loaded, "layout loaded");
        Ok(loaded)
    }

    pub async fn delete_named_layout(&mut self, name: &str) -> Result<bool, StoreError> {
        if self.layouts.remove(name).is_none() {
            return Ok(false);
        }
        self.save_session().await?;
        Ok(true)
    }

    /// Saved layout names with their terminal counts, sorted by name.
    pub fn layout_names(&self) -> Vec<LayoutSummary> {
        self.layouts
            .iter()
            .map(|(name, snapshot)| LayoutSummary {
                name: name.clone(),
                count: snapshot.terminal_count(),
            })
            .collect()
    }

    /// Kill every session and start `snapshot` in its place. Without a
    /// configuration nothing is touched.
    ///
    /// Leaves are started in tree order, then floating panels. A terminal
    /// whose profile is gone or whose shell fails to start is dropped and
    /// the rest carry on.
    pub(crate) async fn replace_with(&mut self, snapshot: &LayoutSnapshot) -> Result<bool, StoreError> {
        let Some(config) = self.config.config() else {
            tracing::debug!("restore: no configuration loaded");
            return Ok(false);
        };

        self.close_all().await;

        let mut restored = Vec::new();
        if let Some(tree) = &snapshot.tree {
            for saved in tree.terminals() {
                restored.push(self.restore_terminal(&config, saved, TerminalMode::Tiled).await);
            }
            if let Some(shape) = tree.rebuild(&mut restored.into_iter()) {
                self.tree = LayoutTree::from_shape(&shape);
            }
        }

        for panel in &snapshot.floating {
            let Some(id) = self
                .restore_terminal(&config, &panel.terminal, TerminalMode::Floating)
                .await
            else {
                continue;
            };
            let z = self.next_z_index();
            self.floating.push(FloatingPanel::new(id, panel.bounds(), z));
        }

        let first = self.first_visible();
        self.set_focused(first);
        self.emit(Event::LayoutChanged);
        tracing::info!(terminals = self.sessions.len(), "session restored");
        Ok(!self.sessions.is_empty())
    }

    async fn restore_terminal(
        &mut self,
        config: &TilemuxConfig,
        saved: &SavedTerminal,
        mode: TerminalMode,
    ) -> Option<TerminalId> {
        let Some(profile) = config.find_profile(&saved.shell_profile_id) else {
            tracing::warn!(profile = %saved.shell_profile_id, "restore: shell profile no longer exists");
            return None;
        };

        let cwd = if saved.cwd.is_empty() || looks_executable(&saved.cwd) {
            default_cwd(config, profile)
        } else {
            saved.cwd.clone()
        };

        let id = TerminalId::new();
        let spawned = match self.spawn_shell(&id, profile, &cwd).await {
            Ok(spawned) => spawned,
            Err(e) => {
                tracing::warn!(error = %e, "restore: skipping terminal");
                return None;
            }
        };

        let title = if saved.title.is_empty() {
            profile.name.clone()
        } else {
            saved.title.clone()
        };
        self.register(TerminalSession {
            mode,
            custom_title: saved.custom_title,
            last_process: saved.last_process.clone(),
            startup_command: saved.startup_command.clone(),
            tab_color: saved.tab_color.clone(),
            ..TerminalSession::tiled(id.clone(), title, &profile.id, cwd, spawned.pid)
        });

        if !saved.startup_command.is_empty() {
            let line = format!("{}\r", saved.startup_command);
            if let Err(e) = self.ptys.write(&id, line.as_bytes()).await {
                tracing::warn!(%id, error = %e, "failed to send startup command");
            }
        }
        Some(id)
    }

    /// Kill every shell and empty the store, keeping directory lists and
    /// named layouts.
    pub(crate) async fn close_all(&mut self) {
        let ids = std::mem::take(&mut self.tab_order);
        for id in &ids {
            if let Some(mode) = self.mode_of(id) {
                self.take_out_of_layout(id, mode);
            }
            if let Err(e) = self.ptys.kill(id).await {
                tracing::warn!(%id, error = %e, "failed to kill pty");
            }
            self.emit(Event::TerminalClosed(id.clone()));
        }
        self.sessions.clear();
        self.tree.clear();
        self.floating.clear();
        self.next_z = FIRST_Z_INDEX;
        self.focus_mode = None;
        self.set_focused(None);
    }
}
