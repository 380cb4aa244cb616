//! PTY spawn logic: open a PTY pair, start the shell, start the reader.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use tokio::sync::mpsc;

use tilemux_common::{PtyError, TerminalId};

use super::types::{HandleMap, PtyHandle, PTY_READ_CHUNK};
use crate::registry::{PtyEvent, PtySpawnRequest, SpawnedPty};

// =============================================================================
// ENVIRONMENT SANITIZATION
// =============================================================================

/// Environment variables inherited from the host process. Everything else
/// must come from the shell profile.
const ALLOWED_ENV_VARS: &[&str] = &[
    "HOME",
    "USER",
    "LOGNAME",
    "SHELL",
    "PATH",
    "TERM",
    "LANG",
    "LC_ALL",
    "LC_CTYPE",
    "DISPLAY",
    "WAYLAND_DISPLAY",
    "XDG_RUNTIME_DIR",
    "TMPDIR",
    "TMP",
    "TEMP",
    // Windows-specific
    "USERPROFILE",
    "APPDATA",
    "LOCALAPPDATA",
    "SYSTEMROOT",
    "COMSPEC",
    "HOMEDRIVE",
    "HOMEPATH",
];

/// Use `cwd` if it is an existing directory, otherwise the home directory.
pub(super) fn resolve_cwd(cwd: &str) -> PathBuf {
    let path = Path::new(cwd);
    if !cwd.is_empty() && path.is_dir() {
        return path.to_path_buf();
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!(requested = cwd, fallback = %home.display(), "PTY cwd not usable");
    home
}

fn build_shell_command(request: &PtySpawnRequest) -> CommandBuilder {
    let mut cmd = CommandBuilder::new(&request.shell_path);
    cmd.args(&request.args);
    cmd.cwd(resolve_cwd(&request.cwd));

    cmd.env_clear();
    for key in ALLOWED_ENV_VARS {
        if let Ok(val) = std::env::var(key) {
            cmd.env(key, val);
        }
    }
    cmd.env("TERM", "xterm-256color");
    for (key, val) in &request.env {
        cmd.env(key, val);
    }

    cmd
}

// =============================================================================
// SPAWN
// =============================================================================

/// Open a PTY, start the shell, register the handle, and start a reader
/// thread that forwards output and finally the exit code on `events`.
///
/// Blocking: call from `spawn_blocking`.
pub(super) fn spawn_pty(
    request: PtySpawnRequest,
    events: mpsc::Sender<PtyEvent>,
    handles: HandleMap,
) -> Result<SpawnedPty, PtyError> {
    let id = request.id.clone();
    let spawn_err = |reason: String| PtyError::Spawn {
        id: id.clone(),
        reason,
    };

    let size = PtySize {
        rows: request.rows,
        cols: request.cols,
        pixel_width: 0,
        pixel_height: 0,
    };

    let pair = native_pty_system()
        .openpty(size)
        .map_err(|e| spawn_err(format!("failed to open PTY: {e}")))?;

    let cmd = build_shell_command(&request);
    let mut child = pair
        .slave
        .spawn_command(cmd)
        .map_err(|e| spawn_err(format!("failed to spawn '{}': {e}", request.shell_path)))?;

    // Only the master side is needed from here on.
    drop(pair.slave);

    let writer = pair
        .master
        .take_writer()
        .map_err(|e| spawn_err(format!("failed to take PTY writer: {e}")))?;
    let mut reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| spawn_err(format!("failed to clone PTY reader: {e}")))?;

    let pid = child.process_id();
    let mut killer = child.clone_killer();

    handles.blocking_lock().insert(
        id.clone(),
        PtyHandle {
            writer: Arc::new(std::sync::Mutex::new(writer)),
            killer: child.clone_killer(),
            master: pair.master,
            size,
        },
    );

    let thread_id = id.clone();
    let thread_handles = handles.clone();
    let spawned = thread::Builder::new()
        .name(format!("pty-reader-{id}"))
        .spawn(move || {
            read_until_exit(&thread_id, &mut reader, &events);
            let exit_code = match child.wait() {
                Ok(status) => Some(status.exit_code()),
                Err(e) => {
                    tracing::debug!("PTY wait error: {e}");
                    None
                }
            };
            thread_handles.blocking_lock().remove(&thread_id);
            let _ = events.blocking_send(PtyEvent::Exit {
                id: thread_id,
                exit_code,
            });
        });

    if let Err(e) = spawned {
        handles.blocking_lock().remove(&id);
        let _ = killer.kill();
        return Err(spawn_err(format!("failed to spawn PTY reader thread: {e}")));
    }

    tracing::info!(%id, ?pid, shell = %request.shell_path, "PTY spawned");
    Ok(SpawnedPty { id, pid })
}

fn read_until_exit(id: &TerminalId, reader: &mut Box<dyn Read + Send>, events: &mpsc::Sender<PtyEvent>) {
    let mut buf = [0u8; PTY_READ_CHUNK];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let event = PtyEvent::Data {
                    id: id.clone(),
                    data: buf[..n].to_vec(),
                };
                if events.blocking_send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(%id, "PTY reader error: {e}");
                break;
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
