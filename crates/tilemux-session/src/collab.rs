//! Collaborator contracts the store depends on: configuration and
//! detached windows.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tokio::sync::mpsc;

use tilemux_common::{ConfigError, TerminalId};
use tilemux_config::TilemuxConfig;
use tilemux_pty::PtyEvent;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Read-only configuration snapshots plus a write path for edits.
pub trait ConfigSource: Send + Sync {
    /// Current configuration, or `None` when none has been loaded yet.
    fn config(&self) -> Option<TilemuxConfig>;

    /// Validate and persist `config`, making it the current snapshot.
    fn update(&self, config: TilemuxConfig) -> Result<(), ConfigError>;
}

/// Configuration backed by a TOML file on disk.
pub struct FileConfigSource {
    path: Option<PathBuf>,
    current: RwLock<TilemuxConfig>,
    cwd_override: Option<String>,
}

impl FileConfigSource {
    /// Wrap an already-loaded config. `path` of `None` means the platform
    /// default location.
    pub fn new(config: TilemuxConfig, path: Option<PathBuf>) -> Self {
        Self {
            path,
            current: RwLock::new(config),
            cwd_override: None,
        }
    }

    /// Load from `path`, or from the platform default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => tilemux_config::load_config_from(p)?,
            None => tilemux_config::load_config()?,
        };
        Ok(Self::new(config, path.map(Path::to_path_buf)))
    }

    /// Use `dir` as the default working directory for this run only.
    /// The override is never written back to disk.
    pub fn with_cwd_override(mut self, dir: impl Into<String>) -> Self {
        self.cwd_override = Some(dir.into());
        self
    }
}

impl ConfigSource for FileConfigSource {
    fn config(&self) -> Option<TilemuxConfig> {
        let mut config = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(dir) = &self.cwd_override {
            config.default_cwd = Some(dir.clone());
        }
        Some(config)
    }

    fn update(&self, mut config: TilemuxConfig) -> Result<(), ConfigError> {
        tilemux_config::validation::validate(&config)?;

        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.cwd_override.is_some() && config.default_cwd == self.cwd_override {
            config.default_cwd = current.default_cwd.clone();
        }

        match &self.path {
            Some(path) => tilemux_config::save_config_to_path(&config, path)?,
            None => tilemux_config::save_config(&config)?,
        }
        tracing::info!(shells = config.shells.len(), "configuration updated");
        *current = config;
        Ok(())
    }
}

// =============================================================================
// DETACHED WINDOWS
// =============================================================================

/// Windows that host a single detached terminal outside the main layout.
///
/// When such a window closes on its own, the host sends
/// [`Command::DetachedClosed`](crate::Command::DetachedClosed) back to the
/// actor so the session can return to the tree.
pub trait DetachedSurfaces: Send + Sync {
    /// Open a window for `id`. `output` carries that terminal's PTY events
    /// until it is reattached or closed.
    fn open_detached(&self, id: &TerminalId, output: mpsc::Receiver<PtyEvent>);

    fn close_detached(&self, id: &TerminalId);

    fn focus_detached(&self, id: &TerminalId);
}

/// Used when no windowing layer is attached (headless driver, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDetachedSurfaces;

impl DetachedSurfaces for NoDetachedSurfaces {
    fn open_detached(&self, id: &TerminalId, _output: mpsc::Receiver<PtyEvent>) {
        tracing::debug!(%id, "no detached window host; output stays on the hub");
    }

    fn close_detached(&self, id: &TerminalId) {
        tracing::debug!(%id, "close_detached ignored");
    }

    fn focus_detached(&self, id: &TerminalId) {
        tracing::debug!(%id, "focus_detached ignored");
    }
}
