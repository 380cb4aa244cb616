//! Terminal session orchestration.
//!
//! [`TerminalStore`] owns every session, the tiling tree and the floating
//! panels, and talks to the PTY registry for process lifecycle.
//! [`SessionActor`] serializes all mutations through one loop that also
//! drains PTY events and runs autosave. [`SurfaceHub`] fans PTY output out
//! to the main window and to detached windows.

pub mod actor;
pub mod collab;
mod error;
pub mod hub;
pub mod persistence;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::{Command, Reply, SessionActor, SessionHandle};
pub use collab::{ConfigSource, DetachedSurfaces, FileConfigSource, NoDetachedSurfaces};
pub use error::StoreError;
pub use hub::SurfaceHub;
pub use persistence::{BlobStore, JsonFileStore, LayoutSummary, MemoryBlobStore, SessionDocument};
pub use store::{FloatingPanel, StoreView, TerminalSession, TerminalStore};
