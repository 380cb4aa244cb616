//! PTY process registry.
//!
//! The session layer only sees [`PtyRegistry`]: create, write, resize and
//! kill by terminal id, with output and exit notifications arriving on a
//! single bounded [`PtyEvent`] channel. [`NativePtyRegistry`] implements
//! it on top of `portable-pty`.

pub mod native;
pub mod registry;

pub use native::{NativePtyRegistry, DEFAULT_COLS, DEFAULT_ROWS};
pub use registry::{event_channel, PtyEvent, PtyRegistry, PtySpawnRequest, SpawnedPty};
