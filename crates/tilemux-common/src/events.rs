use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::TerminalId;
use crate::types::TerminalMode;

/// State changes published by the session store for observers
/// (tab bars, status lines, the driver's reply stream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    TerminalOpened(TerminalId),
    TerminalClosed(TerminalId),
    TerminalFocused(Option<TerminalId>),
    ModeChanged { id: TerminalId, mode: TerminalMode },
    TerminalExited { id: TerminalId, exit_code: Option<u32> },
    LayoutChanged,
    SessionSaved,
    ConfigReloaded,
    Shutdown,
    #[serde(other)]
    Unknown,
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
