//! Native PTY types: the per-terminal handle and shared handle table.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use portable_pty::{ChildKiller, MasterPty, PtySize};
use tokio::sync::Mutex;

use tilemux_common::TerminalId;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Maximum bytes read from a PTY in one go (8 KB).
pub const PTY_READ_CHUNK: usize = 8_192;

/// Default terminal columns.
pub const DEFAULT_COLS: u16 = 80;

/// Default terminal rows.
pub const DEFAULT_ROWS: u16 = 24;

// =============================================================================
// PTY HANDLE
// =============================================================================

/// A live PTY owned by the registry.
///
/// The child process itself belongs to the reader thread, which waits on
/// it after EOF to report the exit code. The registry keeps a killer and
/// the master side for input and resize.
pub(super) struct PtyHandle {
    pub(super) writer: SharedWriter,
    pub(super) killer: Box<dyn ChildKiller + Send + Sync>,
    pub(super) master: Box<dyn MasterPty + Send>,
    pub(super) size: PtySize,
}

pub(super) type HandleMap = Arc<Mutex<HashMap<TerminalId, PtyHandle>>>;

/// Input side of a PTY. Writes block, so they run outside the handle map
/// lock and off the async runtime.
pub(super) type SharedWriter = Arc<std::sync::Mutex<Box<dyn Write + Send>>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pty_constants_are_sane() {
        assert_eq!(PTY_READ_CHUNK, 8_192);
        assert_eq!(DEFAULT_COLS, 80);
        assert_eq!(DEFAULT_ROWS, 24);
    }
}
