//! Fan-out of PTY events to the main window and detached windows.
//!
//! Every stream is bounded and nothing is dropped: when a subscriber falls
//! behind, [`SurfaceHub::publish`] waits for it, which in turn holds back
//! the PTY readers. A subscriber that goes away is pruned on the next
//! publish.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

use tilemux_common::TerminalId;
use tilemux_pty::PtyEvent;

/// Events buffered per main subscriber before publish waits.
const MAIN_CAPACITY: usize = 1024;

/// Events buffered per detached window before publish waits.
const DETACHED_CAPACITY: usize = 256;

#[derive(Default)]
struct Subscribers {
    main: Vec<mpsc::Sender<PtyEvent>>,
    detached: HashMap<TerminalId, mpsc::Sender<PtyEvent>>,
}

/// Publishes every PTY event to all main subscribers and to the detached
/// subscriber registered for that terminal, if any.
///
/// Ordering holds within each stream only.
#[derive(Clone, Default)]
pub struct SurfaceHub {
    subscribers: Arc<Mutex<Subscribers>>,
}

impl SurfaceHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_main(&self) -> mpsc::Receiver<PtyEvent> {
        let (tx, rx) = mpsc::channel(MAIN_CAPACITY);
        self.lock().main.push(tx);
        rx
    }

    /// Register the detached stream for `id`, replacing any previous one.
    pub fn subscribe_detached(&self, id: &TerminalId) -> mpsc::Receiver<PtyEvent> {
        let (tx, rx) = mpsc::channel(DETACHED_CAPACITY);
        self.lock().detached.insert(id.clone(), tx);
        rx
    }

    /// Drop the detached stream for `id`. Returns `false` if there was none.
    pub fn unsubscribe_detached(&self, id: &TerminalId) -> bool {
        self.lock().detached.remove(id).is_some()
    }

    pub fn has_detached(&self, id: &TerminalId) -> bool {
        self.lock().detached.contains_key(id)
    }

    /// Deliver `event` everywhere it belongs, waiting for room in each
    /// stream. An `Exit` closes the detached stream for that terminal after
    /// delivery.
    pub async fn publish(&self, event: &PtyEvent) {
        let id = event.id();
        let (main, detached) = {
            let subscribers = self.lock();
            (subscribers.main.clone(), subscribers.detached.get(id).cloned())
        };

        for tx in &main {
            // A closed receiver is pruned below.
            let _ = tx.send(event.clone()).await;
        }

        let mut detached_gone = false;
        if let Some(tx) = detached {
            if tx.send(event.clone()).await.is_err() {
                tracing::debug!(%id, "detached receiver gone");
                detached_gone = true;
            }
        }

        let mut subscribers = self.lock();
        subscribers.main.retain(|tx| !tx.is_closed());
        if detached_gone || matches!(event, PtyEvent::Exit { .. }) {
            subscribers.detached.remove(id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
