//! Where the session document is kept.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tilemux_common::{PersistenceError, PlatformError};

/// A single opaque blob holding the whole session document.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// The stored blob, or `None` if nothing was ever saved.
    async fn get_blob(&self) -> Result<Option<String>, PersistenceError>;

    async fn set_blob(&self, blob: String) -> Result<(), PersistenceError>;
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON file on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.json` under the platform data directory.
    pub fn at_default_location() -> Result<Self, PlatformError> {
        Ok(Self::new(tilemux_platform::session_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BlobStore for JsonFileStore {
    async fn get_blob(&self) -> Result<Option<String>, PersistenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Read(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn set_blob(&self, blob: String) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PersistenceError::Write(format!("{}: {e}", parent.display()))
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &blob)
            .await
            .map_err(|e| PersistenceError::Write(format!("{}: {e}", tmp_path.display())))?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            // Windows refuses to rename over an open file.
            tracing::warn!("atomic rename failed ({e}), falling back to direct write");
            tokio::fs::write(&self.path, &blob).await.map_err(|e2| {
                PersistenceError::Write(format!("{}: {e2}", self.path.display()))
            })?;
        }

        tracing::debug!(path = %self.path.display(), bytes = blob.len(), "session saved");
        Ok(())
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store for tests and for running without a data directory.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blob: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.blob
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Make every following `set_blob` fail, to exercise error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get_blob(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.contents())
    }

    async fn set_blob(&self, blob: String) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Write("memory store refused write".into()));
        }
        *self
            .blob
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(blob);
        Ok(())
    }
}
