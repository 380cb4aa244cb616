//! Startup wiring: configuration, session storage and the first terminal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tilemux_config::TilemuxConfig;
use tilemux_session::{
    BlobStore, Command, ConfigSource, FileConfigSource, JsonFileStore, MemoryBlobStore, Reply,
    SessionHandle, StoreError,
};

use crate::cli::Args;

/// Load the config named on the command line (or the default one). A bad
/// or missing file is logged and replaced by defaults so the session still
/// starts.
pub fn config_source(args: &Args) -> FileConfigSource {
    let path = args.config.as_deref().map(Path::new);
    if let Some(p) = path {
        tracing::info!("Using config override: {}", p.display());
    }
    let source = FileConfigSource::load(path).unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        FileConfigSource::new(TilemuxConfig::default(), path.map(PathBuf::from))
    });
    match &args.directory {
        Some(dir) => source.with_cwd_override(dir.clone()),
        None => source,
    }
}

/// `session.json` under the data directory, or memory only if the
/// platform has no data directory.
pub fn blob_store() -> Arc<dyn BlobStore> {
    match JsonFileStore::at_default_location() {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "session file");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("No session file location, session will not persist: {e}");
            Arc::new(MemoryBlobStore::new())
        }
    }
}

pub fn should_restore(args: &Args, config: &dyn ConfigSource) -> bool {
    !args.no_restore
        && config
            .config()
            .is_some_and(|c| c.session.restore_on_startup)
}

/// Bring back the saved session, or start one fresh terminal when there
/// is nothing to bring back. Without a restore the saved named layouts and
/// directory lists are still loaded so the next save keeps them.
pub async fn start_session(handle: &SessionHandle, restore: bool) -> Result<(), StoreError> {
    if restore {
        if let Reply::Changed(true) = handle.dispatch(Command::Restore).await? {
            tracing::info!("Previous session restored");
            return Ok(());
        }
    } else {
        handle.dispatch(Command::LoadSavedState).await?;
    }
    handle.dispatch(Command::Create { profile: None }).await?;
    Ok(())
}
