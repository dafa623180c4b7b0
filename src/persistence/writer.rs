//! Fire-and-forget snapshot writer task

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use super::SnapshotStore;
use crate::state::Snapshot;

/// Follow `snapshots` and save every version that arrives.
///
/// Intermediate versions published while a write is in flight are
/// collapsed into the latest one. Failures are logged and skipped.
pub fn spawn_snapshot_writer(
    store: Arc<dyn SnapshotStore>,
    mut snapshots: watch::Receiver<Snapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting snapshot writer task");
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            let store = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || store.save(&snapshot)).await {
                Ok(Ok(())) => debug!("Session snapshot saved"),
                Ok(Err(e)) => warn!("Failed to save session snapshot: {}", e),
                Err(e) => warn!("Snapshot write task failed: {}", e),
            }
        }
        debug!("Snapshot channel closed, writer exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::StoreError,
        persistence::MemoryStore,
        state::{Step, StepSequence},
    };

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn load(&self) -> Result<Option<Snapshot>, StoreError> {
            Ok(None)
        }

        fn save(&self, _snapshot: &Snapshot) -> Result<(), StoreError> {
            Err(StoreError::Json(serde_json::from_str::<()>("x").unwrap_err()))
        }
    }

    #[tokio::test]
    async fn writes_latest_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let (tx, rx) = watch::channel(Snapshot::default());
        let writer = spawn_snapshot_writer(store.clone(), rx);

        let snapshot = Snapshot {
            recipe_id: Some("toast".into()),
            steps: StepSequence::new(vec![Step::new(1, "toast bread")]),
            ..Default::default()
        };
        tx.send(snapshot.clone()).unwrap();
        drop(tx);
        writer.await.unwrap();

        assert_eq!(store.saved(), Some(snapshot));
    }

    #[tokio::test]
    async fn failing_store_does_not_stop_the_writer() {
        let (tx, rx) = watch::channel(Snapshot::default());
        let writer = spawn_snapshot_writer(Arc::new(FailingStore), rx);

        tx.send(Snapshot::default()).unwrap();
        tokio::task::yield_now().await;
        tx.send(Snapshot::default()).unwrap();
        drop(tx);

        assert!(writer.await.is_ok());
    }
}
