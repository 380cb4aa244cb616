//! Session persistence.
//!
//! The whole session, named layouts and directory lists included, is one
//! JSON [`SessionDocument`] kept in a [`BlobStore`]. Saving captures leaf
//! metadata only; restoring starts fresh shells with new ids.

mod blob;
mod document;
mod snapshot;

pub use blob::{BlobStore, JsonFileStore, MemoryBlobStore};
pub use document::{
    LayoutSnapshot, LayoutSummary, SavedPanel, SavedTerminal, SessionDocument, SnapshotNode,
    SESSION_FORMAT_VERSION,
};

#[cfg(test)]
mod tests;
