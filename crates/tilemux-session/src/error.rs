use tilemux_common::{ConfigError, PersistenceError, PtyError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not start terminal: {0}")]
    Spawn(PtyError),

    #[error(transparent)]
    Pty(#[from] PtyError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("session actor is not running")]
    ActorClosed,
}
