//! Snapshot persistence
//!
//! The in-memory state is the source of truth. Stores are written from a
//! background task that follows the snapshot channel, so a write can lag the
//! live state by at most one cycle and never blocks a transition.

pub mod json_file;
pub mod memory;
pub mod writer;

use tracing::warn;

use crate::{error::StoreError, state::Snapshot};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use writer::spawn_snapshot_writer;

/// Key the session snapshot is stored under
pub const SNAPSHOT_KEY: &str = "cooking-storage";

/// Key-scoped durable storage for the full session snapshot
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Read the prior snapshot, treating unreadable state as "no prior state"
pub fn load_or_none(store: &dyn SnapshotStore) -> Option<Snapshot> {
    match store.load() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Ignoring unreadable saved session: {}", e);
            None
        }
    }
}
