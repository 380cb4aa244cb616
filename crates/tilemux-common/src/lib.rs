pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, PersistenceError, PlatformError, PtyError, TilemuxError};
pub use events::{Event, EventBus};
pub use id::{new_id, TerminalId};
pub use types::{Rect, TerminalMode};

pub type Result<T> = std::result::Result<T, TilemuxError>;
