//! Scripted collaborators shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use tilemux_common::{ConfigError, PtyError, TerminalId};
use tilemux_config::{ShellProfile, TilemuxConfig};
use tilemux_pty::{PtyEvent, PtyRegistry, PtySpawnRequest, SpawnedPty};

use crate::collab::{ConfigSource, DetachedSurfaces};
use crate::persistence::MemoryBlobStore;
use crate::store::TerminalStore;

/// Shell path that the fake registry refuses to start.
pub const BROKEN_SHELL: &str = "/bin/broken";

#[derive(Default)]
struct FakeState {
    next_pid: u32,
    live: HashSet<TerminalId>,
    created: Vec<PtySpawnRequest>,
    writes: Vec<(TerminalId, Vec<u8>)>,
    resizes: Vec<(TerminalId, u16, u16)>,
    killed: Vec<TerminalId>,
}

/// In-memory registry that records every call.
#[derive(Default)]
pub struct FakePtys {
    state: Mutex<FakeState>,
}

impl FakePtys {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn created(&self) -> Vec<PtySpawnRequest> {
        self.state().created.clone()
    }

    pub fn live_count(&self) -> usize {
        self.state().live.len()
    }

    pub fn is_live(&self, id: &TerminalId) -> bool {
        self.state().live.contains(id)
    }

    pub fn killed(&self) -> Vec<TerminalId> {
        self.state().killed.clone()
    }

    pub fn resizes(&self) -> Vec<(TerminalId, u16, u16)> {
        self.state().resizes.clone()
    }

    /// Everything written to `id`, as text.
    pub fn written_to(&self, id: &TerminalId) -> String {
        self.state()
            .writes
            .iter()
            .filter(|(target, _)| target == id)
            .map(|(_, data)| String::from_utf8_lossy(data).into_owned())
            .collect()
    }
}

#[async_trait]
impl PtyRegistry for FakePtys {
    async fn create(&self, request: PtySpawnRequest) -> Result<SpawnedPty, PtyError> {
        let mut state = self.state();
        if request.shell_path == BROKEN_SHELL {
            return Err(PtyError::Spawn {
                id: request.id.clone(),
                reason: "no such file or directory".into(),
            });
        }
        state.next_pid += 1;
        let pid = 1000 + state.next_pid;
        state.live.insert(request.id.clone());
        let id = request.id.clone();
        state.created.push(request);
        Ok(SpawnedPty { id, pid: Some(pid) })
    }

    async fn write(&self, id: &TerminalId, data: &[u8]) -> Result<(), PtyError> {
        let mut state = self.state();
        if !state.live.contains(id) {
            return Err(PtyError::NotFound(id.clone()));
        }
        state.writes.push((id.clone(), data.to_vec()));
        Ok(())
    }

    async fn resize(&self, id: &TerminalId, cols: u16, rows: u16) -> Result<(), PtyError> {
        let mut state = self.state();
        if !state.live.contains(id) {
            return Err(PtyError::NotFound(id.clone()));
        }
        state.resizes.push((id.clone(), cols, rows));
        Ok(())
    }

    async fn kill(&self, id: &TerminalId) -> Result<(), PtyError> {
        let mut state = self.state();
        if state.live.remove(id) {
            state.killed.push(id.clone());
        }
        Ok(())
    }

    async fn kill_all(&self) {
        let mut state = self.state();
        let live: Vec<_> = state.live.drain().collect();
        state.killed.extend(live);
    }
}

/// Configuration held in memory; `None` simulates "not loaded yet".
pub struct FixedConfig {
    config: Mutex<Option<TilemuxConfig>>,
}

impl FixedConfig {
    pub fn new(config: Option<TilemuxConfig>) -> Arc<Self> {
        Arc::new(Self {
            config: Mutex::new(config),
        })
    }

    /// Swap the configuration, e.g. to `None` to simulate losing it.
    pub fn set(&self, config: Option<TilemuxConfig>) {
        *self.config.lock().unwrap() = config;
    }
}

impl ConfigSource for FixedConfig {
    fn config(&self) -> Option<TilemuxConfig> {
        self.config.lock().unwrap().clone()
    }

    fn update(&self, config: TilemuxConfig) -> Result<(), ConfigError> {
        tilemux_config::validation::validate(&config)?;
        *self.config.lock().unwrap() = Some(config);
        Ok(())
    }
}

/// Records window requests and keeps the output streams handed over.
#[derive(Default)]
pub struct RecordingSurfaces {
    log: Mutex<Vec<String>>,
    streams: Mutex<HashMap<TerminalId, mpsc::Receiver<PtyEvent>>>,
}

impl RecordingSurfaces {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn take_stream(&self, id: &TerminalId) -> Option<mpsc::Receiver<PtyEvent>> {
        self.streams.lock().unwrap().remove(id)
    }
}

impl DetachedSurfaces for RecordingSurfaces {
    fn open_detached(&self, id: &TerminalId, output: mpsc::Receiver<PtyEvent>) {
        self.log.lock().unwrap().push(format!("open:{id}"));
        self.streams.lock().unwrap().insert(id.clone(), output);
    }

    fn close_detached(&self, id: &TerminalId) {
        self.log.lock().unwrap().push(format!("close:{id}"));
    }

    fn focus_detached(&self, id: &TerminalId) {
        self.log.lock().unwrap().push(format!("focus:{id}"));
    }
}

/// Two profiles: `bash` (default) and `zsh` with a profile env and cwd,
/// plus `broken`, whose shell never starts.
pub fn test_config() -> TilemuxConfig {
    let mut zsh = ShellProfile::new("zsh", "Zsh", "/bin/zsh", &["-l"]);
    zsh.env.insert("ZDOTDIR".into(), "/etc/zsh".into());
    zsh.cwd = Some("/srv/zsh".into());
    TilemuxConfig {
        shells: vec![
            ShellProfile::new("bash", "Bash", "/bin/bash", &[]),
            zsh,
            ShellProfile::new("broken", "Broken", BROKEN_SHELL, &[]),
        ],
        default_shell_id: "bash".into(),
        default_cwd: Some("/home/test".into()),
        ..TilemuxConfig::default()
    }
}

pub struct Harness {
    pub store: TerminalStore,
    pub config: Arc<FixedConfig>,
    pub ptys: Arc<FakePtys>,
    pub surfaces: Arc<RecordingSurfaces>,
    pub blobs: Arc<MemoryBlobStore>,
}

pub fn harness() -> Harness {
    harness_with(Some(test_config()), Arc::new(MemoryBlobStore::new()))
}

pub fn harness_with(config: Option<TilemuxConfig>, blobs: Arc<MemoryBlobStore>) -> Harness {
    let ptys = FakePtys::new();
    let surfaces = RecordingSurfaces::new();
    let config = FixedConfig::new(config);
    let store = TerminalStore::new(config.clone(), ptys.clone(), blobs.clone())
        .with_detached(surfaces.clone());
    Harness {
        store,
        config,
        ptys,
        surfaces,
        blobs,
    }
}

impl Harness {
    /// Create a terminal with the default profile.
    pub async fn open(&mut self) -> TerminalId {
        self.store.create_terminal(None).await.unwrap().unwrap()
    }

    pub fn assert_consistent(&self) {
        if let Err(e) = self.store.check_invariants() {
            panic!("store invariants broken: {e}");
        }
    }
}
