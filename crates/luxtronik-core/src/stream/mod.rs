// ── Snapshot streams ──
//
// Subscription handle for consumers that re-render on every refresh.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use luxtronik_device::Snapshot;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

type Shared = Option<Arc<Snapshot>>;

/// A subscription to the coordinator's cached snapshot.
///
/// `None` means no read has succeeded yet (or the coordinator shut down).
pub struct SnapshotStream {
    current: Shared,
    receiver: watch::Receiver<Shared>,
}

impl SnapshotStream {
    pub(crate) fn new(receiver: watch::Receiver<Shared>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &Shared {
        &self.current
    }

    /// The latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> Shared {
        self.receiver.borrow().clone()
    }

    /// Wait for the next replacement.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Shared> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current.clone_from(&snap);
        Some(snap)
    }

    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding the snapshot after every replacement,
/// starting with the current one.
pub struct SnapshotWatchStream {
    inner: WatchStream<Shared>,
}

impl Stream for SnapshotWatchStream {
    type Item = Shared;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures_util::StreamExt;
    use tokio_test::{assert_pending, assert_ready};

    use super::*;
    use crate::store::SnapshotStore;

    #[test]
    fn changed_waits_for_a_replacement() {
        let store = SnapshotStore::new();
        let mut stream = store.subscribe();
        assert!(stream.current().is_none());

        let mut changed = tokio_test::task::spawn(stream.changed());
        assert_pending!(changed.poll());

        store.replace(Snapshot::default());
        assert!(changed.is_woken());
        let next = assert_ready!(changed.poll());
        assert!(next.unwrap().is_some());
        drop(changed);

        assert!(stream.current().is_some());
    }

    #[tokio::test]
    async fn into_stream_yields_current_then_replacements() {
        let store = SnapshotStore::new();
        let mut stream = store.subscribe().into_stream();

        assert!(stream.next().await.unwrap().is_none());

        store.replace(Snapshot::default());
        assert!(stream.next().await.unwrap().is_some());

        store.clear();
        assert!(stream.next().await.unwrap().is_none());
    }
}
