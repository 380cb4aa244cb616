//! The registry contract shared by the native implementation and test fakes.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;

use tilemux_common::{PtyError, TerminalId};

/// Capacity of the multiplexed event channel. Reader threads block when
/// the consumer falls this far behind.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Everything needed to start one shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtySpawnRequest {
    pub id: TerminalId,
    pub shell_path: String,
    pub args: Vec<String>,
    pub cwd: String,
    pub env: HashMap<String, String>,
    pub cols: u16,
    pub rows: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedPty {
    pub id: TerminalId,
    pub pid: Option<u32>,
}

/// Output or termination of a PTY, tagged with its terminal id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PtyEvent {
    Data { id: TerminalId, data: Vec<u8> },
    Exit { id: TerminalId, exit_code: Option<u32> },
}

impl PtyEvent {
    pub fn id(&self) -> &TerminalId {
        match self {
            PtyEvent::Data { id, .. } | PtyEvent::Exit { id, .. } => id,
        }
    }
}

pub fn event_channel() -> (mpsc::Sender<PtyEvent>, mpsc::Receiver<PtyEvent>) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}

/// Process lifecycle by terminal id.
///
/// Unknown ids are not an error for `kill`, which is idempotent. `write`
/// and `resize` report [`PtyError::NotFound`].
#[async_trait]
pub trait PtyRegistry: Send + Sync {
    async fn create(&self, request: PtySpawnRequest) -> Result<SpawnedPty, PtyError>;

    async fn write(&self, id: &TerminalId, data: &[u8]) -> Result<(), PtyError>;

    async fn resize(&self, id: &TerminalId, cols: u16, rows: u16) -> Result<(), PtyError>;

    async fn kill(&self, id: &TerminalId) -> Result<(), PtyError>;

    async fn kill_all(&self);
}
