//! Single serialized store for the observable session state.

use crate::snapshot::SessionSnapshot;
use futures_core::Stream;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Holds the current [`SessionSnapshot`] and fans published snapshots out
/// to subscribers.
///
/// All writes go through [`mutate`], which applies the transform and
/// notifies every subscriber inside one critical section. Subscribers
/// therefore observe every published snapshot exactly once, in publish
/// order, with no coalescing and no torn reads.
///
/// [`mutate`]: StateStore::mutate
pub struct StateStore {
    inner: Mutex<Inner>,
}

struct Inner {
    snapshot: SessionSnapshot,
    subscribers: Vec<mpsc::UnboundedSender<SessionSnapshot>>,
}

impl StateStore {
    /// Create a store holding the default (disconnected, empty) snapshot.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                snapshot: SessionSnapshot::default(),
                subscribers: Vec::new(),
            }),
        }
    }

    /// The latest published snapshot. Never blocks beyond the lock.
    pub fn current(&self) -> SessionSnapshot {
        self.inner.lock().unwrap().snapshot.clone()
    }

    /// Subscribe to the snapshot stream.
    ///
    /// Yields the current snapshot first, then every snapshot published
    /// afterwards, in publish order. The stream is infinite; it ends only
    /// when the subscriber is dropped.
    pub fn subscribe(&self) -> impl Stream<Item = SessionSnapshot> + Send + use<> {
        let mut rx = {
            let mut inner = self.inner.lock().unwrap();
            let (tx, rx) = mpsc::unbounded_channel();
            // Seeding inside the critical section pins the stream's first
            // element to the snapshot that was current at subscribe time.
            let _ = tx.send(inner.snapshot.clone());
            inner.subscribers.push(tx);
            rx
        };
        async_stream::stream! {
            while let Some(snapshot) = rx.recv().await {
                yield snapshot;
            }
        }
    }

    /// The single write path: replace the snapshot with
    /// `transform(current)` and notify all subscribers.
    ///
    /// Subscribers whose receiving half is gone are pruned here.
    pub fn mutate<F>(&self, transform: F)
    where
        F: FnOnce(SessionSnapshot) -> SessionSnapshot,
    {
        let mut inner = self.inner.lock().unwrap();
        let next = transform(inner.snapshot.clone());
        tracing::debug!(
            state = ?next.connection_state,
            messages = next.messages.len(),
            "publishing session snapshot"
        );
        inner.snapshot = next.clone();
        inner.subscribers.retain(|tx| tx.send(next.clone()).is_ok());
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
