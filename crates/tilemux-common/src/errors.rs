use std::path::PathBuf;

use crate::id::TerminalId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("path error: {0}")]
    PathError(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PtyError {
    #[error("failed to spawn pty for {id}: {reason}")]
    Spawn { id: TerminalId, reason: String },

    #[error("no pty for terminal {0}")]
    NotFound(TerminalId),

    #[error("pty io error: {0}")]
    Io(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read session store: {0}")]
    Read(String),

    #[error("failed to write session store: {0}")]
    Write(String),

    #[error("malformed session document: {0}")]
    Format(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TilemuxError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Pty(#[from] PtyError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
