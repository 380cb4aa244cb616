//! The single loop that owns the [`TerminalStore`].
//!
//! Commands arrive over a bounded channel with a oneshot reply slot, PTY
//! events over the registry's channel. Each one is applied to completion
//! before the next is read, so the store needs no locking. Autosave takes
//! the snapshot inside the loop and hands the encoded document to a
//! writer task, so slow disks never hold up a command.

mod command;


pub use command::{Command, Reply};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use tilemux_common::Event;
use tilemux_pty::PtyEvent;
use tilemux_tiling::Side;

use crate::error::StoreError;
use crate::persistence::BlobStore;
use crate::store::TerminalStore;
use command::Request;

/// Pending commands before senders start waiting.
const COMMAND_CAPACITY: usize = 64;

const DEFAULT_AUTOSAVE_SECS: u64 = 5;

/// Cloneable front door to a running [`SessionActor`].
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Request>,
}

impl SessionHandle {
    /// Send `command` and wait for its reply.
    pub async fn dispatch(&self, command: Command) -> Result<Reply, StoreError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request { command, reply })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        rx.await.map_err(|_| StoreError::ActorClosed)?
    }
}

/// Latest encoded document waiting to be written, and the task writing it.
struct Writer {
    pending: watch::Sender<Option<String>>,
    task: JoinHandle<()>,
}

pub struct SessionActor {
    store: TerminalStore,
    commands: mpsc::Receiver<Request>,
    pty_events: mpsc::Receiver<PtyEvent>,
    autosave_every: Duration,
    writer: Option<Writer>,
}

impl SessionActor {
    /// Wrap `store`. The autosave period comes from the session config.
    pub fn new(
        store: TerminalStore,
        pty_events: mpsc::Receiver<PtyEvent>,
    ) -> (Self, SessionHandle) {
        let (tx, commands) = mpsc::channel(COMMAND_CAPACITY);
        let secs = store
            .config
            .config()
            .map(|c| c.session.autosave_interval_secs)
            .unwrap_or(DEFAULT_AUTOSAVE_SECS)
            .max(1);
        let actor = Self {
            store,
            commands,
            pty_events,
            autosave_every: Duration::from_secs(secs),
            writer: None,
        };
        (actor, SessionHandle { tx })
    }

    pub fn with_autosave_interval(mut self, every: Duration) -> Self {
        self.autosave_every = every;
        self
    }

    pub fn store(&self) -> &TerminalStore {
        &self.store
    }

    // =========================================================================
    // LOOP
    // =========================================================================

    /// Run until a `Shutdown` command or until every handle is dropped.
    pub async fn run(mut self) {
        let (pending, rx) = watch::channel(None);
        let task = tokio::spawn(write_behind(self.store.blobs.clone(), rx));
        self.writer = Some(Writer { pending, task });

        let every = self.autosave_every;
        let mut autosave = time::interval_at(Instant::now() + every, every);
        autosave.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(every = ?self.autosave_every, "session actor started");
        loop {
            tokio::select! {
                request = self.commands.recv() => {
                    let Some(Request { command, reply }) = request else {
                        tracing::debug!("all session handles dropped");
                        self.shutdown().await;
                        break;
                    };
                    let stop = matches!(command, Command::Shutdown);
                    let persist = command.touches_directories();
                    let result = self.dispatch(command).await;
                    if persist && result.is_ok() {
                        self.persist_in_background();
                    }
                    // The requester may have given up waiting.
                    let _ = reply.send(result);
                    if stop {
                        break;
                    }
                }

                Some(event) = self.pty_events.recv() => {
                    self.store.hub().publish(&event).await;
                    self.store.handle_pty_event(&event);
                }

                _ = autosave.tick() => {
                    if !self.store.is_empty() {
                        self.persist_in_background();
                    }
                }
            }
        }
        tracing::info!("session actor stopped");
    }

    /// Apply one command to the store.
    pub async fn dispatch(&mut self, command: Command) -> Result<Reply, StoreError> {
        let store = &mut self.store;
        let reply = match command {
            Command::Create { profile } => {
                Reply::Created(store.create_terminal(profile.as_deref()).await?)
            }
            Command::Split { target, axis, side } => {
                Reply::Created(store.split_terminal(&target, axis, side).await?)
            }
            Command::Close { id } => Reply::Changed(store.close_terminal(&id).await),
            Command::Write { id, data } => {
                Reply::Changed(store.write_terminal(&id, data.as_bytes()).await?)
            }
            Command::Resize { id, cols, rows } => {
                Reply::Changed(store.resize_terminal(&id, cols, rows).await?)
            }

            Command::MoveToFloat { id } => Reply::Changed(store.move_to_float(&id)),
            Command::MoveToTiling { id, target, side } => {
                let anchor = target.as_ref().map(|t| (t, side.unwrap_or(Side::Right)));
                Reply::Changed(store.move_to_tiling(&id, anchor))
            }
            Command::MoveToDormant { id } => Reply::Changed(store.move_to_dormant(&id)),
            Command::WakeFromDormant { id } => Reply::Changed(store.wake_from_dormant(&id)),
            Command::Detach { id } => Reply::Changed(store.detach_terminal(&id)),
            Command::Reattach { id } => Reply::Changed(store.reattach_terminal(&id)),
            Command::DetachedClosed { id } => Reply::Changed(store.detached_closed(&id)),

            Command::SetFocus { id } => Reply::Changed(store.set_focus(&id)),
            Command::FocusNext => Reply::Changed(store.focus_next()),
            Command::FocusPrev => Reply::Changed(store.focus_prev()),
            Command::FocusDirection { direction } => Reply::Changed(store.focus_direction(direction)),
            Command::ToggleFocusMode { id } => Reply::Changed(store.toggle_focus_mode(id.as_ref())),

            Command::Reorder { dragged, over } => {
                Reply::Changed(store.reorder_terminals(&dragged, &over))
            }
            Command::SetSplitRatio { split, ratio } => {
                Reply::Changed(store.set_split_ratio(split, ratio))
            }
            Command::Swap { a, b } => Reply::Changed(store.swap_terminals(&a, &b)),
            Command::MoveDirection { id, direction } => {
                Reply::Changed(store.move_terminal_direction(&id, direction))
            }
            Command::Equalize => Reply::Changed(store.equalize_layout()),
            Command::UpdateFloatingPanel { id, bounds } => {
                Reply::Changed(store.update_floating_panel(&id, bounds))
            }
            Command::ToggleMaximize { id } => Reply::Changed(store.toggle_maximize(&id)),
            Command::SetViewport { bounds } => {
                store.set_viewport(bounds);
                Reply::Done
            }
            Command::ZoomIn => Reply::FontSize(store.zoom_in()),
            Command::ZoomOut => Reply::FontSize(store.zoom_out()),
            Command::ZoomReset => Reply::FontSize(store.zoom_reset()),

            Command::Rename { id, title, custom } => {
                Reply::Changed(store.rename_terminal(&id, &title, custom))
            }
            Command::SetTabColor { id, color } => Reply::Changed(store.set_tab_color(&id, color)),
            Command::SetStartupCommand { id, command } => {
                Reply::Changed(store.set_startup_command(&id, &command))
            }
            Command::ReportTitle { id, title } => Reply::Changed(store.report_title(&id, &title)),
            Command::AddFavoriteDir { dir } => Reply::Changed(store.add_favorite_dir(&dir)),
            Command::RemoveFavoriteDir { dir } => Reply::Changed(store.remove_favorite_dir(&dir)),
            Command::AddRecentDir { dir } => Reply::Changed(store.add_recent_dir(&dir)),
            Command::RemoveRecentDir { dir } => Reply::Changed(store.remove_recent_dir(&dir)),
            Command::CdToDir { dir } => Reply::Changed(store.cd_to_dir(&dir).await?),
            Command::UpdateConfig { config } => {
                store.update_config(*config)?;
                Reply::Done
            }

            Command::Save => {
                store.save_session().await?;
                Reply::Done
            }
            Command::Restore => Reply::Changed(store.restore_session().await?),
            Command::LoadSavedState => Reply::Changed(store.load_saved_state().await?.is_some()),
            Command::SaveLayout { name } => {
                store.save_named_layout(&name).await?;
                Reply::Done
            }
            Command::LoadLayout { name } => Reply::Changed(store.load_named_layout(&name).await?),
            Command::DeleteLayout { name } => {
                Reply::Changed(store.delete_named_layout(&name).await?)
            }
            Command::LayoutNames => Reply::Layouts(store.layout_names()),

            Command::State => Reply::State(Box::new(store.view())),
            Command::Shutdown => {
                self.shutdown().await;
                Reply::Done
            }
        };
        Ok(reply)
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Snapshot now, write later. Without a running writer (dispatch used
    /// outside `run`) nothing is queued.
    fn persist_in_background(&self) {
        let Some(writer) = &self.writer else {
            return;
        };
        match self.store.encode_document() {
            Ok(blob) => {
                writer.pending.send_replace(Some(blob));
            }
            Err(e) => tracing::warn!(error = %e, "autosave: could not encode session"),
        }
    }

    /// Flush the writer, save once more directly, then kill every shell.
    async fn shutdown(&mut self) {
        if let Some(Writer { pending, task }) = self.writer.take() {
            drop(pending);
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "session writer task failed");
            }
        }
        if let Err(e) = self.store.save_session().await {
            tracing::warn!(error = %e, "final session save failed");
        }
        self.store.ptys.kill_all().await;
        self.store.emit(Event::Shutdown);
        tracing::info!("session shut down");
    }
}

/// Write every document handed over, newest first. A failed write is
/// logged; the next autosave hands over a fresh copy.
async fn write_behind(blobs: Arc<dyn BlobStore>, mut pending: watch::Receiver<Option<String>>) {
    while pending.changed().await.is_ok() {
        let Some(blob) = pending.borrow_and_update().clone() else {
            continue;
        };
        match blobs.set_blob(blob).await {
            Ok(()) => tracing::debug!("session autosaved"),
            Err(e) => tracing::warn!(error = %e, "autosave failed; will retry"),
        }
    }
}
