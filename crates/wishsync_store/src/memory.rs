//! In-memory real-time document store.

use crate::error::{StoreError, StoreResult};
use crate::path::{CollectionPath, DocumentPath};
use crate::remote::RemoteStore;
use crate::subscription::{subscription_channel, Snapshot, SnapshotEvent, SnapshotSender, Subscription};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;
use wishsync_codec::{EntityId, RawFields, RawRecord};

/// Counters of calls made against a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// `subscribe_collection` calls.
    pub subscribes: u64,
    /// `get_document` calls.
    pub gets: u64,
    /// `list_documents` calls.
    pub lists: u64,
    /// `set_document` calls.
    pub sets: u64,
    /// `delete_document` calls.
    pub deletes: u64,
}

impl StoreStats {
    /// Total number of calls of any kind.
    pub fn total(&self) -> u64 {
        self.subscribes + self.gets + self.lists + self.sets + self.deletes
    }
}

#[derive(Default)]
struct Inner {
    collections: HashMap<CollectionPath, BTreeMap<EntityId, RawFields>>,
    subscribers: HashMap<CollectionPath, Vec<SnapshotSender>>,
    denied: HashSet<CollectionPath>,
    offline: bool,
    stats: StoreStats,
}

impl Inner {
    fn snapshot(&self, path: &CollectionPath) -> Snapshot {
        let records = self
            .collections
            .get(path)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| RawRecord::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Snapshot::new(path.clone(), records)
    }

    fn check_access(&self, path: &CollectionPath) -> StoreResult<()> {
        if self.offline {
            return Err(StoreError::unavailable("store is offline"));
        }
        if self.denied.contains(path) {
            return Err(StoreError::permission_denied(path));
        }
        Ok(())
    }

    /// Pushes the current snapshot to every live subscriber of `path`.
    ///
    /// Offline stores stay silent; the next broadcast after reconnecting
    /// carries every change made in between.
    fn broadcast(&mut self, path: &CollectionPath) {
        if self.offline {
            return;
        }
        let snapshot = self.snapshot(path);
        if let Some(senders) = self.subscribers.get_mut(path) {
            senders.retain(|tx| tx.send(SnapshotEvent::Snapshot(snapshot.clone())));
        }
    }
}

/// An in-memory real-time document store.
///
/// This store keeps every collection in memory and is suitable for:
/// - Unit and integration tests
/// - Demos and the command-line tool
/// - Embedding where no hosted store is available
///
/// # Behaviour
///
/// - `subscribe_collection` queues an initial snapshot immediately
/// - Every write broadcasts a full snapshot to all live subscribers of
///   the affected collection
/// - Each call yields to the scheduler once before touching state,
///   modelling a network round trip
/// - Deleting a missing document succeeds
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across tasks.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a document as another client would, notifying subscribers.
    ///
    /// Bypasses access checks and call counters.
    pub fn seed(&self, path: &CollectionPath, record: RawRecord) {
        let mut inner = self.inner.write();
        inner
            .collections
            .entry(path.clone())
            .or_default()
            .insert(record.id, record.fields);
        inner.broadcast(path);
    }

    /// Deletes a document as another client would, notifying subscribers.
    pub fn evict(&self, path: &DocumentPath) {
        let mut inner = self.inner.write();
        if let Some(docs) = inner.collections.get_mut(path.collection()) {
            docs.remove(path.id());
        }
        inner.broadcast(path.collection());
    }

    /// Denies all access to a collection.
    ///
    /// Live subscribers receive a `PermissionDenied` failure and are dropped.
    pub fn deny(&self, path: &CollectionPath) {
        let mut inner = self.inner.write();
        inner.denied.insert(path.clone());
        if let Some(senders) = inner.subscribers.remove(path) {
            let failure = SnapshotEvent::Failed(StoreError::permission_denied(path));
            for tx in senders {
                tx.send(failure.clone());
            }
        }
    }

    /// Restores access to a previously denied collection.
    pub fn allow(&self, path: &CollectionPath) {
        self.inner.write().denied.remove(path);
    }

    /// Makes every call fail with `Unavailable` while `offline` is true.
    ///
    /// Existing subscriptions stay open but receive nothing new.
    pub fn set_offline(&self, offline: bool) {
        self.inner.write().offline = offline;
    }

    /// Returns the call counters.
    pub fn stats(&self) -> StoreStats {
        self.inner.read().stats.clone()
    }

    /// Returns the number of live subscribers for a collection.
    pub fn subscriber_count(&self, path: &CollectionPath) -> usize {
        self.inner
            .read()
            .subscribers
            .get(path)
            .map(|senders| senders.iter().filter(|tx| !tx.is_cancelled()).count())
            .unwrap_or(0)
    }

    /// Returns the number of documents in a collection.
    pub fn document_count(&self, path: &CollectionPath) -> usize {
        self.inner
            .read()
            .collections
            .get(path)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn subscribe_collection(&self, path: &CollectionPath) -> StoreResult<Subscription> {
        tokio::task::yield_now().await;
        let mut inner = self.inner.write();
        inner.stats.subscribes += 1;
        inner.check_access(path)?;

        let (tx, subscription) = subscription_channel();
        tx.send(SnapshotEvent::Snapshot(inner.snapshot(path)));
        let senders = inner.subscribers.entry(path.clone()).or_default();
        senders.retain(|s| !s.is_cancelled());
        senders.push(tx);
        debug!(%path, subscribers = senders.len(), "subscription opened");
        Ok(subscription)
    }

    async fn get_document(&self, path: &DocumentPath) -> StoreResult<Option<RawRecord>> {
        tokio::task::yield_now().await;
        let mut inner = self.inner.write();
        inner.stats.gets += 1;
        inner.check_access(path.collection())?;
        Ok(inner
            .collections
            .get(path.collection())
            .and_then(|docs| docs.get(path.id()))
            .map(|fields| RawRecord::new(path.id().clone(), fields.clone())))
    }

    async fn list_documents(&self, path: &CollectionPath) -> StoreResult<Vec<RawRecord>> {
        tokio::task::yield_now().await;
        let mut inner = self.inner.write();
        inner.stats.lists += 1;
        inner.check_access(path)?;
        Ok(inner.snapshot(path).records)
    }

    async fn set_document(&self, path: &DocumentPath, fields: RawFields) -> StoreResult<()> {
        tokio::task::yield_now().await;
        let mut inner = self.inner.write();
        inner.stats.sets += 1;
        inner.check_access(path.collection())?;
        inner
            .collections
            .entry(path.collection().clone())
            .or_default()
            .insert(path.id().clone(), fields);
        inner.broadcast(path.collection());
        Ok(())
    }

    async fn delete_document(&self, path: &DocumentPath) -> StoreResult<()> {
        tokio::task::yield_now().await;
        let mut inner = self.inner.write();
        inner.stats.deletes += 1;
        inner.check_access(path.collection())?;
        let removed = inner
            .collections
            .get_mut(path.collection())
            .and_then(|docs| docs.remove(path.id()))
            .is_some();
        if removed {
            inner.broadcast(path.collection());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wishsync_codec::FieldValue;

    fn wishlist(owner: &str) -> CollectionPath {
        CollectionPath::new("accounts", owner, "wishlist").unwrap()
    }

    fn record(id: &str, name: &str) -> RawRecord {
        RawRecord::new(
            EntityId::parse(id).unwrap(),
            RawFields::from([("name".to_string(), FieldValue::from(name))]),
        )
    }

    async fn next_snapshot(sub: &mut Subscription) -> Snapshot {
        match sub.next().await {
            Some(SnapshotEvent::Snapshot(s)) => s,
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn offline_store_stops_broadcasting() {
        let store = MemoryStore::new();
        let path = wishlist("u1");
        let mut sub = store.subscribe_collection(&path).await.unwrap();
        assert!(next_snapshot(&mut sub).await.records.is_empty());

        store.set_offline(true);
        store.seed(&path, record("p1", "Shoe"));
        let quiet = tokio::time::timeout(std::time::Duration::from_millis(50), sub.next()).await;
        assert!(quiet.is_err());

        store.set_offline(false);
        store.seed(&path, record("p2", "Hat"));
        assert_eq!(next_snapshot(&mut sub).await.records.len(), 2);
    }

    #[tokio::test]
    async fn subscribe_delivers_initial_snapshot() {
        let store = MemoryStore::new();
        let path = wishlist("u1");
        store.seed(&path, record("p1", "Shoe"));

        let mut sub = store.subscribe_collection(&path).await.unwrap();
        let snapshot = next_snapshot(&mut sub).await;
        assert_eq!(snapshot.records, vec![record("p1", "Shoe")]);
        assert_eq!(store.subscriber_count(&path), 1);
    }

    #[tokio::test]
    async fn writes_broadcast_full_snapshots() {
        let store = MemoryStore::new();
        let path = wishlist("u1");
        let mut sub = store.subscribe_collection(&path).await.unwrap();
        assert!(next_snapshot(&mut sub).await.records.is_empty());

        let doc = path.document(&EntityId::parse("p1").unwrap());
        store
            .set_document(&doc, record("p1", "Shoe").fields)
            .await
            .unwrap();
        assert_eq!(next_snapshot(&mut sub).await.records.len(), 1);

        store.delete_document(&doc).await.unwrap();
        assert!(next_snapshot(&mut sub).await.records.is_empty());
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        store.seed(&wishlist("u1"), record("p1", "Shoe"));

        let listed = store.list_documents(&wishlist("u2")).await.unwrap();
        assert!(listed.is_empty());
        assert_eq!(store.document_count(&wishlist("u1")), 1);
    }

    #[tokio::test]
    async fn delete_missing_document_succeeds() {
        let store = MemoryStore::new();
        let doc = wishlist("u1").document(&EntityId::parse("ghost").unwrap());
        assert!(store.delete_document(&doc).await.is_ok());
    }

    #[tokio::test]
    async fn denied_path_fails_subscribe_and_reads() {
        let store = MemoryStore::new();
        let path = wishlist("u1");
        store.deny(&path);

        let err = store.subscribe_collection(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::PermissionDenied { .. }));

        let doc = path.document(&EntityId::parse("p1").unwrap());
        assert!(store.get_document(&doc).await.is_err());

        store.allow(&path);
        assert!(store.get_document(&doc).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deny_fails_live_subscribers() {
        let store = MemoryStore::new();
        let path = wishlist("u1");
        let mut sub = store.subscribe_collection(&path).await.unwrap();
        next_snapshot(&mut sub).await;

        store.deny(&path);
        assert!(matches!(
            sub.next().await,
            Some(SnapshotEvent::Failed(StoreError::PermissionDenied { .. }))
        ));
        assert_eq!(store.subscriber_count(&path), 0);
    }

    #[tokio::test]
    async fn offline_store_is_unavailable() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let err = store.list_documents(&wishlist("u1")).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn cancelled_subscribers_are_pruned() {
        let store = MemoryStore::new();
        let path = wishlist("u1");
        let sub = store.subscribe_collection(&path).await.unwrap();
        sub.cancel();
        assert_eq!(store.subscriber_count(&path), 0);

        store.seed(&path, record("p1", "Shoe"));
        assert!(store.inner.read().subscribers[&path].is_empty());
    }

    #[tokio::test]
    async fn stats_count_calls() {
        let store = MemoryStore::new();
        let path = wishlist("u1");
        let doc = path.document(&EntityId::parse("p1").unwrap());

        store.get_document(&doc).await.unwrap();
        store.set_document(&doc, RawFields::new()).await.unwrap();
        store.delete_document(&doc).await.unwrap();

        let stats = store.stats();
        assert_eq!(stats.gets, 1);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.deletes, 1);
        assert_eq!(stats.total(), 3);
    }
}
