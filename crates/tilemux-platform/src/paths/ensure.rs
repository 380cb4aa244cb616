use std::fs;
use std::path::PathBuf;

use tilemux_common::PlatformError;

use super::resolve::{config_dir, data_dir};

/// Directories tilemux writes to: the config file and the session document.
pub(super) fn managed_dirs() -> Result<Vec<PathBuf>, PlatformError> {
    Ok(vec![config_dir()?, data_dir()?])
}

/// Creates all tilemux directories if they do not already exist.
pub fn ensure_dirs() -> Result<(), PlatformError> {
    for dir in managed_dirs()? {
        fs::create_dir_all(&dir).map_err(|e| {
            PlatformError::PathError(format!("failed to create {}: {e}", dir.display()))
        })?;
        tracing::debug!(path = %dir.display(), "ensured directory");
    }
    Ok(())
}
