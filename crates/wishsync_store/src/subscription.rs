//! Cancellable snapshot subscriptions.
//!
//! A subscription is a one-way channel from the store to a single
//! consumer. The store pushes [`SnapshotEvent`]s through a
//! [`SnapshotSender`]; the consumer pulls them from a [`Subscription`].
//!
//! Cancellation is explicit and shared through a [`CancelHandle`]:
//! - After `cancel()`, `Subscription::next` returns `None`, even if events
//!   were already queued
//! - `SnapshotSender::send` reports the cancellation so the store can
//!   drop the sender

use crate::error::StoreError;
use crate::path::CollectionPath;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use wishsync_codec::RawRecord;

/// The complete state of a collection at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The collection this snapshot describes.
    pub path: CollectionPath,
    /// Every document currently in the collection.
    pub records: Vec<RawRecord>,
}

impl Snapshot {
    /// Creates a snapshot.
    pub fn new(path: CollectionPath, records: Vec<RawRecord>) -> Self {
        Self { path, records }
    }
}

/// An event delivered on a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotEvent {
    /// A full snapshot of the collection.
    Snapshot(Snapshot),
    /// The subscription failed; no further events follow.
    Failed(StoreError),
}

/// Shared cancellation flag for one subscription.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelHandle {
    /// Creates a live (not cancelled) handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the subscription. Idempotent.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            // Stores a permit, so a consumer not yet parked still wakes.
            self.notify.notify_one();
        }
    }

    /// Returns true once `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Store-side end of a subscription channel.
#[derive(Debug, Clone)]
pub struct SnapshotSender {
    tx: mpsc::UnboundedSender<SnapshotEvent>,
    cancel: CancelHandle,
}

impl SnapshotSender {
    /// Sends an event.
    ///
    /// Returns `false` if the subscription was cancelled or its consumer
    /// dropped; the store should then forget this sender.
    pub fn send(&self, event: SnapshotEvent) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.tx.send(event).is_ok()
    }

    /// Sends an event without consulting the cancellation flag.
    ///
    /// Models a transport whose callback keeps firing after cancel;
    /// consumers must stay inert regardless.
    pub fn send_unchecked(&self, event: SnapshotEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Returns true if the subscription was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Consumer-side end of a subscription channel.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<SnapshotEvent>,
    cancel: CancelHandle,
}

impl Subscription {
    /// Receives the next event.
    ///
    /// Returns `None` once the subscription is cancelled or the store has
    /// dropped every sender.
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let event = tokio::select! {
            biased;
            _ = self.cancel.notify.notified() => None,
            event = self.rx.recv() => event,
        };
        // Cancellation may have raced the receive.
        if self.cancel.is_cancelled() {
            return None;
        }
        event
    }

    /// Cancels this subscription.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a handle that can cancel this subscription from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Returns true if this subscription was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Creates a connected sender/subscription pair.
pub fn subscription_channel() -> (SnapshotSender, Subscription) {
    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancelHandle::new();
    (
        SnapshotSender {
            tx,
            cancel: cancel.clone(),
        },
        Subscription { rx, cancel },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> SnapshotEvent {
        let path = CollectionPath::new("accounts", "u1", "wishlist").unwrap();
        SnapshotEvent::Snapshot(Snapshot::new(path, Vec::new()))
    }

    #[tokio::test]
    async fn delivers_in_order() {
        let (tx, mut sub) = subscription_channel();
        assert!(tx.send(empty_snapshot()));
        assert!(tx.send(SnapshotEvent::Failed(StoreError::unavailable("reset"))));

        assert_eq!(sub.next().await, Some(empty_snapshot()));
        assert_eq!(
            sub.next().await,
            Some(SnapshotEvent::Failed(StoreError::unavailable("reset")))
        );
    }

    #[tokio::test]
    async fn cancel_hides_queued_events() {
        let (tx, mut sub) = subscription_channel();
        assert!(tx.send(empty_snapshot()));
        sub.cancel();

        assert!(tx.is_cancelled());
        assert!(!tx.send(empty_snapshot()));
        assert!(tx.send_unchecked(empty_snapshot()));
        assert_eq!(sub.next().await, None);
    }

    #[tokio::test]
    async fn cancel_wakes_parked_consumer() {
        let (_tx, mut sub) = subscription_channel();
        let handle = sub.cancel_handle();

        let consumer = tokio::spawn(async move { sub.next().await });
        tokio::task::yield_now().await;
        handle.cancel();

        assert_eq!(consumer.await.unwrap(), None);
    }

    #[tokio::test]
    async fn dropped_sender_ends_stream() {
        let (tx, mut sub) = subscription_channel();
        drop(tx);
        assert_eq!(sub.next().await, None);
    }

    #[test]
    fn cancel_is_idempotent() {
        let handle = CancelHandle::new();
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }
}
