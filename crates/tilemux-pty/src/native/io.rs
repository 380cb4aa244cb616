//! PTY I/O operations on a single handle: write input, resize, kill.

use std::io::Write;

use portable_pty::PtySize;

use tilemux_common::PtyError;

use super::types::{PtyHandle, SharedWriter};

/// Write raw input bytes to the PTY. Blocks while the PTY input buffer is full.
pub(super) fn write_input(writer: &SharedWriter, data: &[u8]) -> Result<(), PtyError> {
    let mut writer = writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    writer
        .write_all(data)
        .map_err(|e| PtyError::Io(format!("PTY write failed: {e}")))?;
    writer
        .flush()
        .map_err(|e| PtyError::Io(format!("PTY flush failed: {e}")))?;
    Ok(())
}

/// [`write_input`] on the blocking pool.
pub(super) async fn write_off_runtime(writer: SharedWriter, data: Vec<u8>) -> Result<(), PtyError> {
    tokio::task::spawn_blocking(move || write_input(&writer, &data))
        .await
        .map_err(|e| PtyError::Io(format!("PTY write task failed: {e}")))?
}

impl PtyHandle {
    pub(super) fn resize(&mut self, cols: u16, rows: u16) -> Result<(), PtyError> {
        let new_size = PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        self.master
            .resize(new_size)
            .map_err(|e| PtyError::Io(format!("PTY resize failed: {e}")))?;
        self.size = new_size;
        Ok(())
    }

    pub(super) fn kill(&mut self) {
        if let Err(e) = self.killer.kill() {
            tracing::debug!("PTY kill error (may already be dead): {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{mpsc, Arc, Mutex};
    use std::time::Duration;

    use super::*;

    /// Records bytes, but only after the test lets each write through.
    struct GatedWriter {
        gate: mpsc::Receiver<()>,
        written: Arc<Mutex<Vec<u8>>>,
    }

    impl Write for GatedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let _ = self.gate.recv();
            self.written.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn blocked_write_leaves_the_runtime_running() {
        let (open_gate, gate) = mpsc::channel();
        let written = Arc::new(Mutex::new(Vec::new()));
        let gated: Box<dyn Write + Send> = Box::new(GatedWriter {
            gate,
            written: Arc::clone(&written),
        });
        let writer: SharedWriter = Arc::new(Mutex::new(gated));

        let pending = tokio::spawn(write_off_runtime(writer, b"ls\r".to_vec()));

        // The single-threaded runtime still runs timers while the write is stuck.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!pending.is_finished());
        assert!(written.lock().unwrap().is_empty());

        open_gate.send(()).unwrap();
        pending.await.unwrap().unwrap();
        assert_eq!(written.lock().unwrap().as_slice(), b"ls\r");
    }

    #[tokio::test]
    async fn write_errors_are_reported() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let broken: Box<dyn Write + Send> = Box::new(Broken);
        let writer: SharedWriter = Arc::new(Mutex::new(broken));
        let err = write_off_runtime(writer, b"x".to_vec()).await.unwrap_err();
        assert!(matches!(err, PtyError::Io(_)));
    }
}
