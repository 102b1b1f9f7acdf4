// ── Snapshot store ──
//
// Holds the most recent successful read. Snapshots are replaced whole,
// never merged, and every replacement is broadcast to subscribers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use luxtronik_device::{Field, Snapshot};
use tokio::sync::watch;

use crate::model::FieldId;
use crate::stream::SnapshotStream;

/// Reactive holder for the cached snapshot.
pub struct SnapshotStore {
    snapshot: watch::Sender<Option<Arc<Snapshot>>>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        let (last_refresh, _) = watch::channel(None);
        Self {
            snapshot,
            last_refresh,
        }
    }

    /// The current snapshot, if any read has succeeded.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.borrow().clone()
    }

    /// Install a freshly read snapshot and stamp the refresh time.
    pub(crate) fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.snapshot.send_replace(Some(Arc::clone(&snapshot)));
        self.last_refresh.send_replace(Some(Utc::now()));
        snapshot
    }

    /// Drop the cached snapshot.
    pub(crate) fn clear(&self) {
        self.snapshot.send_replace(None);
    }

    /// Resolve `id` against the current snapshot.
    pub fn field(&self, id: &FieldId) -> Option<Field> {
        let snapshot = self.snapshot.borrow();
        snapshot
            .as_ref()?
            .get(id.group(), id.field())
            .cloned()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.snapshot.subscribe())
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// Time since the last successful refresh.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|at| Utc::now() - at)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
