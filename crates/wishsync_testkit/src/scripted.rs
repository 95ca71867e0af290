//! A remote store whose timing is controlled by the test.
//!
//! Documents live in an inner [`MemoryStore`], but subscriptions never
//! receive anything on their own: the test decides when (and whether)
//! each snapshot arrives, can hold a subscribe call in flight, and can
//! keep firing into channels the consumer already cancelled.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use wishsync_codec::{RawFields, RawRecord};
use wishsync_store::{
    subscription_channel, CollectionPath, DocumentPath, MemoryStore, RemoteStore, Snapshot,
    SnapshotEvent, SnapshotSender, StoreError, StoreResult, StoreStats, Subscription,
};

#[derive(Default)]
struct Script {
    channels: Vec<(CollectionPath, SnapshotSender)>,
    gates: HashMap<CollectionPath, Arc<Semaphore>>,
    fail_subscribe: Option<StoreError>,
    fail_reads: Option<StoreError>,
    fail_writes: Option<StoreError>,
}

/// A store with test-driven snapshot delivery and fault injection.
#[derive(Default)]
pub struct ScriptedStore {
    documents: MemoryStore,
    script: Mutex<Script>,
}

impl ScriptedStore {
    /// Creates an empty scripted store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The document store behind reads and writes.
    pub fn documents(&self) -> &MemoryStore {
        &self.documents
    }

    /// Delivers a snapshot to every live subscription of `path`.
    ///
    /// Returns how many subscriptions accepted it.
    pub fn deliver(&self, path: &CollectionPath, records: Vec<RawRecord>) -> usize {
        let event = SnapshotEvent::Snapshot(Snapshot::new(path.clone(), records));
        self.senders(path)
            .iter()
            .filter(|tx| tx.send(event.clone()))
            .count()
    }

    /// Delivers the current document state of `path` to live subscriptions.
    pub async fn deliver_current(&self, path: &CollectionPath) -> usize {
        let records = self
            .documents
            .list_documents(path)
            .await
            .unwrap_or_default();
        self.deliver(path, records)
    }

    /// Delivers a snapshot to every subscription ever opened on `path`,
    /// including cancelled ones.
    pub fn deliver_unchecked(&self, path: &CollectionPath, records: Vec<RawRecord>) -> usize {
        let event = SnapshotEvent::Snapshot(Snapshot::new(path.clone(), records));
        self.senders(path)
            .iter()
            .filter(|tx| tx.send_unchecked(event.clone()))
            .count()
    }

    /// Fails every live subscription of `path`.
    pub fn fail_stream(&self, path: &CollectionPath, error: StoreError) -> usize {
        let event = SnapshotEvent::Failed(error);
        self.senders(path)
            .iter()
            .filter(|tx| tx.send(event.clone()))
            .count()
    }

    /// Every sender ever handed out for `path`, oldest first.
    pub fn senders(&self, path: &CollectionPath) -> Vec<SnapshotSender> {
        self.script
            .lock()
            .channels
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, tx)| tx.clone())
            .collect()
    }

    /// Number of subscriptions on `path` that are not cancelled.
    pub fn live_subscriptions(&self, path: &CollectionPath) -> usize {
        self.senders(path)
            .iter()
            .filter(|tx| !tx.is_cancelled())
            .count()
    }

    /// Number of subscriptions ever opened on `path`.
    pub fn opened_subscriptions(&self, path: &CollectionPath) -> usize {
        self.senders(path).len()
    }

    /// Number of subscriptions opened on any path.
    pub fn subscribe_calls(&self) -> usize {
        self.script.lock().channels.len()
    }

    /// Makes subscribe calls for `path` wait until [`release`](Self::release).
    pub fn hold(&self, path: &CollectionPath) {
        self.script
            .lock()
            .gates
            .insert(path.clone(), Arc::new(Semaphore::new(0)));
    }

    /// Lets one held subscribe call for `path` proceed.
    pub fn release(&self, path: &CollectionPath) {
        if let Some(gate) = self.script.lock().gates.get(path) {
            gate.add_permits(1);
        }
    }

    /// Makes the next subscribe call fail with `error`.
    pub fn fail_next_subscribe(&self, error: StoreError) {
        self.script.lock().fail_subscribe = Some(error);
    }

    /// Makes every read fail with `error` (or succeed again with `None`).
    pub fn fail_reads(&self, error: Option<StoreError>) {
        self.script.lock().fail_reads = error;
    }

    /// Makes every write fail with `error` (or succeed again with `None`).
    pub fn fail_writes(&self, error: Option<StoreError>) {
        self.script.lock().fail_writes = error;
    }

    /// Call counters of the document store.
    pub fn stats(&self) -> StoreStats {
        self.documents.stats()
    }

    fn read_fault(&self) -> StoreResult<()> {
        self.script.lock().fail_reads.clone().map_or(Ok(()), Err)
    }

    fn write_fault(&self) -> StoreResult<()> {
        self.script.lock().fail_writes.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl RemoteStore for ScriptedStore {
    async fn subscribe_collection(&self, path: &CollectionPath) -> StoreResult<Subscription> {
        let gate = self.script.lock().gates.get(path).cloned();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let mut script = self.script.lock();
        if let Some(error) = script.fail_subscribe.take() {
            return Err(error);
        }
        let (tx, subscription) = subscription_channel();
        script.channels.push((path.clone(), tx));
        Ok(subscription)
    }

    async fn get_document(&self, path: &DocumentPath) -> StoreResult<Option<RawRecord>> {
        self.read_fault()?;
        self.documents.get_document(path).await
    }

    async fn list_documents(&self, path: &CollectionPath) -> StoreResult<Vec<RawRecord>> {
        self.read_fault()?;
        self.documents.list_documents(path).await
    }

    async fn set_document(&self, path: &DocumentPath, fields: RawFields) -> StoreResult<()> {
        self.write_fault()?;
        self.documents.set_document(path, fields).await
    }

    async fn delete_document(&self, path: &DocumentPath) -> StoreResult<()> {
        self.write_fault()?;
        self.documents.delete_document(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{product, product_record, wishlist_path};

    #[tokio::test]
    async fn nothing_arrives_until_delivered() {
        let store = ScriptedStore::new();
        let path = wishlist_path("u1");
        let mut sub = store.subscribe_collection(&path).await.unwrap();

        assert_eq!(store.deliver(&path, vec![product_record(&product("p1", "Shoe"))]), 1);
        assert!(matches!(sub.next().await, Some(SnapshotEvent::Snapshot(s)) if s.records.len() == 1));
    }

    #[tokio::test]
    async fn unchecked_delivery_reaches_cancelled_channels() {
        let store = ScriptedStore::new();
        let path = wishlist_path("u1");
        let sub = store.subscribe_collection(&path).await.unwrap();
        sub.cancel();

        assert_eq!(store.deliver(&path, Vec::new()), 0);
        assert_eq!(store.deliver_unchecked(&path, Vec::new()), 1);
        assert_eq!(store.live_subscriptions(&path), 0);
        assert_eq!(store.opened_subscriptions(&path), 1);
    }

    #[tokio::test]
    async fn injected_faults() {
        let store = ScriptedStore::new();
        let path = wishlist_path("u1");

        store.fail_next_subscribe(StoreError::permission_denied(&path));
        assert!(store.subscribe_collection(&path).await.is_err());
        assert!(store.subscribe_collection(&path).await.is_ok());

        store.fail_reads(Some(StoreError::unavailable("offline")));
        assert!(store.list_documents(&path).await.is_err());
        store.fail_reads(None);
        assert!(store.list_documents(&path).await.is_ok());
    }
}
