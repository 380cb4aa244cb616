//! Native PTY registry backed by `portable-pty`.
//!
//! Each terminal gets its own PTY and a background reader thread that
//! forwards output chunks, then the exit code, onto the shared event
//! channel. The registry itself only keeps what it needs for input,
//! resize and kill.

mod io;
mod spawn;
mod types;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use tilemux_common::{PtyError, TerminalId};

use crate::registry::{PtyEvent, PtyRegistry, PtySpawnRequest, SpawnedPty};
pub use types::{DEFAULT_COLS, DEFAULT_ROWS};
use types::HandleMap;

pub struct NativePtyRegistry {
    handles: HandleMap,
    events: mpsc::Sender<PtyEvent>,
}

impl NativePtyRegistry {
    pub fn new(events: mpsc::Sender<PtyEvent>) -> Self {
        Self {
            handles: Arc::new(Mutex::new(HashMap::new())),
            events,
        }
    }

    /// Ids with a live PTY.
    pub async fn ids(&self) -> Vec<TerminalId> {
        self.handles.lock().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.handles.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.handles.lock().await.is_empty()
    }

    /// Current `(cols, rows)` of a PTY.
    pub async fn size(&self, id: &TerminalId) -> Option<(u16, u16)> {
        self.handles
            .lock()
            .await
            .get(id)
            .map(|h| (h.size.cols, h.size.rows))
    }
}

#[async_trait]
impl PtyRegistry for NativePtyRegistry {
    async fn create(&self, request: PtySpawnRequest) -> Result<SpawnedPty, PtyError> {
        let id = request.id.clone();
        let events = self.events.clone();
        let handles = Arc::clone(&self.handles);
        tokio::task::spawn_blocking(move || spawn::spawn_pty(request, events, handles))
            .await
            .map_err(|e| PtyError::Spawn {
                id,
                reason: format!("spawn task failed: {e}"),
            })?
    }

    async fn write(&self, id: &TerminalId, data: &[u8]) -> Result<(), PtyError> {
        let writer = {
            let handles = self.handles.lock().await;
            let handle = handles
                .get(id)
                .ok_or_else(|| PtyError::NotFound(id.clone()))?;
            Arc::clone(&handle.writer)
        };
        io::write_off_runtime(writer, data.to_vec()).await
    }

    async fn resize(&self, id: &TerminalId, cols: u16, rows: u16) -> Result<(), PtyError> {
        let mut handles = self.handles.lock().await;
        let handle = handles
            .get_mut(id)
            .ok_or_else(|| PtyError::NotFound(id.clone()))?;
        handle.resize(cols, rows)
    }

    async fn kill(&self, id: &TerminalId) -> Result<(), PtyError> {
        let removed = self.handles.lock().await.remove(id);
        if let Some(mut handle) = removed {
            handle.kill();
            tracing::debug!(%id, "PTY killed");
        }
        Ok(())
    }

    async fn kill_all(&self) {
        let drained: Vec<_> = self.handles.lock().await.drain().collect();
        let count = drained.len();
        for (_, mut handle) in drained {
            handle.kill();
        }
        tracing::info!(count, "all PTYs killed");
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::registry::event_channel;
    use std::time::Duration;

    fn sh_request(id: &str) -> PtySpawnRequest {
        PtySpawnRequest {
            id: TerminalId::from(id),
            shell_path: "/bin/sh".into(),
            args: vec![],
            cwd: std::env::temp_dir().to_string_lossy().into_owned(),
            env: HashMap::from([("TILEMUX_TEST".into(), "1".into())]),
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }

    /// Collect output for `id` until `needle` shows up or the deadline passes.
    async fn wait_for_output(rx: &mut mpsc::Receiver<PtyEvent>, id: &TerminalId, needle: &str) -> bool {
        let mut seen = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while let Ok(Some(event)) = tokio::time::timeout_at(deadline, rx.recv()).await {
            if let PtyEvent::Data { id: from, data } = event {
                if &from == id {
                    seen.extend_from_slice(&data);
                    if String::from_utf8_lossy(&seen).contains(needle) {
                        return true;
                    }
                }
            }
        }
        false
    }

    #[tokio::test]
    async fn create_write_and_read_echo() {
        let (tx, mut rx) = event_channel();
        let registry = NativePtyRegistry::new(tx);
        let spawned = registry.create(sh_request("echo")).await.unwrap();
        assert_eq!(spawned.id, TerminalId::from("echo"));
        assert!(spawned.pid.is_some());

        registry
            .write(&spawned.id, b"echo PTY_TEST_MARKER_$TILEMUX_TEST\n")
            .await
            .unwrap();
        assert!(wait_for_output(&mut rx, &spawned.id, "PTY_TEST_MARKER_1").await);

        registry.kill(&spawned.id).await.unwrap();
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn resize_updates_size() {
        let (tx, _rx) = event_channel();
        let registry = NativePtyRegistry::new(tx);
        let id = registry.create(sh_request("resize")).await.unwrap().id;
        assert_eq!(registry.size(&id).await, Some((80, 24)));

        registry.resize(&id, 120, 40).await.unwrap();
        assert_eq!(registry.size(&id).await, Some((120, 40)));

        registry.kill_all().await;
    }

    #[tokio::test]
    async fn exit_is_reported_with_code() {
        let (tx, mut rx) = event_channel();
        let registry = NativePtyRegistry::new(tx);
        let id = registry.create(sh_request("exit")).await.unwrap().id;
        registry.write(&id, b"exit 3\n").await.unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        let mut exit = None;
        while let Ok(Some(event)) = tokio::time::timeout_at(deadline, rx.recv()).await {
            if let PtyEvent::Exit { exit_code, .. } = event {
                exit = Some(exit_code);
                break;
            }
        }
        assert_eq!(exit, Some(Some(3)));
        assert!(!registry.ids().await.contains(&id));
    }

    #[tokio::test]
    async fn spawn_failure_registers_nothing() {
        let (tx, _rx) = event_channel();
        let registry = NativePtyRegistry::new(tx);
        let mut request = sh_request("missing");
        request.shell_path = "/no/such/shell/tilemux".into();

        let err = registry.create(request).await.unwrap_err();
        assert!(matches!(err, PtyError::Spawn { .. }));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_ids() {
        let (tx, _rx) = event_channel();
        let registry = NativePtyRegistry::new(tx);
        let ghost = TerminalId::from("ghost");

        assert!(matches!(
            registry.write(&ghost, b"x").await,
            Err(PtyError::NotFound(_))
        ));
        assert!(matches!(
            registry.resize(&ghost, 10, 10).await,
            Err(PtyError::NotFound(_))
        ));
        assert!(registry.kill(&ghost).await.is_ok());
    }

    #[tokio::test]
    async fn kill_all_is_idempotent() {
        let (tx, _rx) = event_channel();
        let registry = NativePtyRegistry::new(tx);
        registry.create(sh_request("a")).await.unwrap();
        registry.create(sh_request("b")).await.unwrap();
        assert_eq!(registry.len().await, 2);

        registry.kill_all().await;
        registry.kill_all().await;
        assert!(registry.is_empty().await);
    }
}
