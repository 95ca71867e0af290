//! Reactive mirror of one identity's remote collection.
//!
//! A [`CollectionMirror`] owns at most one live store subscription. Each
//! call to [`CollectionMirror::subscribe`] starts a new *generation*:
//! the previous subscription is cancelled, its pump task aborted, and any
//! update it still tries to publish is rejected by a generation check
//! taken under the same lock that guards the view. Late snapshots from a
//! cancelled channel therefore never reach observers.

use crate::config::WishlistConfig;
use crate::error::{WishlistError, WishlistResult};
use crate::identity::{Identity, IdentityProvider};
use crate::notify::{DecodeFault, FaultSink, TracingFaultSink};
use crate::view::CollectionView;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use wishsync_codec::EntityCodec;
use wishsync_store::{
    CancelHandle, CollectionPath, RemoteStore, Snapshot, SnapshotEvent, Subscription,
};

struct ActiveSubscription {
    path: CollectionPath,
    cancel: CancelHandle,
    pump: JoinHandle<()>,
}

#[derive(Default)]
struct MirrorState {
    generation: u64,
    identity: Option<Identity>,
    active: Option<ActiveSubscription>,
    follower: Option<JoinHandle<()>>,
}

impl MirrorState {
    /// Invalidates the current generation and releases its subscription.
    fn teardown(&mut self) -> u64 {
        self.generation += 1;
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            active.pump.abort();
            debug!(path = %active.path, "subscription torn down");
        }
        self.generation
    }
}

struct Shared<E: EntityCodec> {
    store: Arc<dyn RemoteStore>,
    config: WishlistConfig,
    faults: Arc<dyn FaultSink>,
    view: watch::Sender<CollectionView<E>>,
    state: Mutex<MirrorState>,
}

impl<E: EntityCodec> Shared<E> {
    /// Replaces the view, provided `generation` is still current.
    fn publish(
        &self,
        generation: u64,
        update: impl FnOnce(&CollectionView<E>) -> CollectionView<E>,
    ) -> WishlistResult<()> {
        let state = self.state.lock();
        if state.generation != generation {
            return Err(WishlistError::StaleSubscriptionUpdate);
        }
        self.view.send_modify(|view| {
            let next = update(view);
            *view = next;
        });
        Ok(())
    }

    /// Like `publish`, for callers that have nothing to do when superseded.
    fn settle(&self, generation: u64, update: impl FnOnce(&CollectionView<E>) -> CollectionView<E>) {
        if let Err(err) = self.publish(generation, update) {
            debug!(generation, %err, "superseded before settling");
        }
    }

    fn decode(&self, snapshot: &Snapshot) -> (Vec<E>, Vec<DecodeFault>) {
        let mut items = Vec::with_capacity(snapshot.records.len());
        let mut faults = Vec::new();
        for record in &snapshot.records {
            match E::decode(record.id.clone(), &record.fields) {
                Ok(item) => items.push(item),
                Err(source) => faults.push(DecodeFault {
                    path: snapshot.path.clone(),
                    error: WishlistError::Decode {
                        id: record.id.clone(),
                        source,
                    },
                }),
            }
        }
        (items, faults)
    }

    async fn subscribe(self: &Arc<Self>, identity: Identity) {
        let generation = {
            let mut state = self.state.lock();
            let generation = state.teardown();
            state.identity = Some(identity.clone());
            generation
        };

        let path = match self.config.collection_path(&identity) {
            Ok(Some(path)) => path,
            Ok(None) => {
                debug!(generation, "anonymous identity, mirroring an empty collection");
                self.settle(generation, |_| CollectionView::empty());
                return;
            }
            Err(err) => {
                self.settle(generation, |_| CollectionView::failed(err));
                return;
            }
        };

        if self
            .publish(generation, |_| CollectionView::loading())
            .is_err()
        {
            return;
        }
        debug!(%path, generation, "subscribing");

        let subscription = match self.store.subscribe_collection(&path).await {
            Ok(subscription) => subscription,
            Err(err) => {
                warn!(%path, %err, "subscription could not be established");
                self.settle(generation, |_| CollectionView::failed(err.into()));
                return;
            }
        };

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(%path, "subscription superseded while being established");
            subscription.cancel();
            return;
        }
        let cancel = subscription.cancel_handle();
        let pump = tokio::spawn(Self::pump(Arc::downgrade(self), generation, subscription));
        state.active = Some(ActiveSubscription { path, cancel, pump });
    }

    async fn pump(weak: Weak<Self>, generation: u64, mut subscription: Subscription) {
        while let Some(event) = subscription.next().await {
            let Some(shared) = weak.upgrade() else {
                break;
            };
            let published = match event {
                SnapshotEvent::Snapshot(snapshot) => {
                    let (items, faults) = shared.decode(&snapshot);
                    let count = items.len();
                    shared
                        .publish(generation, move |_| CollectionView::ready(items))
                        .map(|()| {
                            trace!(path = %snapshot.path, count, dropped = faults.len(), "snapshot applied");
                            for fault in faults {
                                shared.faults.report(fault);
                            }
                            true
                        })
                }
                SnapshotEvent::Failed(err) => {
                    warn!(%err, generation, "subscription failed");
                    shared
                        .publish(generation, move |previous| CollectionView {
                            items: previous.items.clone(),
                            is_loading: false,
                            error: Some(err.into()),
                        })
                        .map(|()| false)
                }
            };
            match published {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    debug!(generation, %err, "discarding update from torn-down subscription");
                    break;
                }
            }
        }
    }
}

/// Replicates one identity's remote collection into local reactive state.
///
/// The mirror exposes a [`CollectionView`] through a `tokio::sync::watch`
/// channel. It never writes to the store.
///
/// # Lifecycle
///
/// - [`subscribe`](Self::subscribe) tears down any previous subscription
///   before starting a new one; at most one is live at a time
/// - [`unsubscribe`](Self::unsubscribe) is idempotent; no update is
///   published after it returns
/// - Dropping the mirror unsubscribes and stops any identity follower
///
/// The mirror spawns Tokio tasks and must be used inside a Tokio runtime.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use wishsync_codec::Product;
/// use wishsync_engine::{CollectionMirror, Identity, WishlistConfig};
/// use wishsync_store::MemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = Arc::new(MemoryStore::new());
/// let mirror: CollectionMirror<Product> = CollectionMirror::new(store, WishlistConfig::default());
///
/// mirror.subscribe(Identity::Anonymous).await;
/// let view = mirror.view();
/// assert!(view.is_empty() && !view.is_loading && view.error.is_none());
/// # }
/// ```
pub struct CollectionMirror<E: EntityCodec> {
    shared: Arc<Shared<E>>,
}

impl<E: EntityCodec> CollectionMirror<E> {
    /// Creates an idle mirror that logs decode faults.
    pub fn new(store: Arc<dyn RemoteStore>, config: WishlistConfig) -> Self {
        Self::with_fault_sink(store, config, Arc::new(TracingFaultSink))
    }

    /// Creates an idle mirror that reports decode faults to `faults`.
    pub fn with_fault_sink(
        store: Arc<dyn RemoteStore>,
        config: WishlistConfig,
        faults: Arc<dyn FaultSink>,
    ) -> Self {
        let (view, _) = watch::channel(CollectionView::loading());
        Self {
            shared: Arc::new(Shared {
                store,
                config,
                faults,
                view,
                state: Mutex::new(MirrorState::default()),
            }),
        }
    }

    /// Starts mirroring `identity`, replacing any previous subscription.
    ///
    /// Returns once the subscription is established or has failed. Failure
    /// is reported through the view's `error`, never as a return value.
    pub async fn subscribe(&self, identity: Identity) {
        self.shared.subscribe(identity).await;
    }

    /// Stops mirroring. Idempotent.
    ///
    /// The view keeps its last value and receives no further updates.
    pub fn unsubscribe(&self) {
        let mut state = self.shared.state.lock();
        state.teardown();
        state.identity = None;
    }

    /// Subscribes to the provider's current identity, then re-subscribes
    /// on every identity change until [`stop_following`](Self::stop_following)
    /// or drop.
    pub async fn follow<P: IdentityProvider + ?Sized>(&self, provider: &P) {
        let mut identities = provider.watch();
        let identity = identities.borrow_and_update().clone();
        self.shared.subscribe(identity).await;

        let weak = Arc::downgrade(&self.shared);
        let follower = tokio::spawn(async move {
            while identities.changed().await.is_ok() {
                // A newer identity abandons a subscribe still waiting on the store.
                loop {
                    let identity = identities.borrow_and_update().clone();
                    let Some(shared) = weak.upgrade() else {
                        return;
                    };
                    debug!(%identity, "identity changed");
                    tokio::select! {
                        () = shared.subscribe(identity) => break,
                        changed = identities.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });

        if let Some(previous) = self.shared.state.lock().follower.replace(follower) {
            previous.abort();
        }
    }

    /// Stops reacting to identity changes. The current subscription stays.
    pub fn stop_following(&self) {
        if let Some(follower) = self.shared.state.lock().follower.take() {
            follower.abort();
        }
    }

    /// Returns the current view.
    pub fn view(&self) -> CollectionView<E> {
        self.shared.view.borrow().clone()
    }

    /// Returns a receiver that observes every view change.
    pub fn watch(&self) -> watch::Receiver<CollectionView<E>> {
        self.shared.view.subscribe()
    }

    /// Returns the identity being mirrored, if subscribed.
    pub fn identity(&self) -> Option<Identity> {
        self.shared.state.lock().identity.clone()
    }

    /// Returns the collection path of the live subscription, if any.
    pub fn subscribed_path(&self) -> Option<CollectionPath> {
        self.shared
            .state
            .lock()
            .active
            .as_ref()
            .map(|active| active.path.clone())
    }
}

impl<E: EntityCodec> Drop for CollectionMirror<E> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        if let Some(follower) = state.follower.take() {
            follower.abort();
        }
        state.teardown();
    }
}
