//! Identity-bound wishlist facade.

use crate::config::WishlistConfig;
use crate::error::{WishlistError, WishlistResult};
use crate::identity::IdentityProvider;
use crate::mirror::CollectionMirror;
use crate::mutate::{RemovalMutator, ToggleMutator, ToggleOutcome};
use crate::notify::{DecodeFault, FaultSink, NotificationSink, TracingFaultSink, TracingSink};
use crate::view::CollectionView;
use std::sync::Arc;
use tokio::sync::watch;
use wishsync_codec::{EntityCodec, EntityId};
use wishsync_store::RemoteStore;

/// Builder for [`Wishlist`].
pub struct WishlistBuilder {
    store: Arc<dyn RemoteStore>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn NotificationSink>,
    faults: Arc<dyn FaultSink>,
    config: WishlistConfig,
}

impl WishlistBuilder {
    /// Starts building a wishlist over `store` for `identity`.
    pub fn new(store: Arc<dyn RemoteStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            identity,
            notifier: Arc::new(TracingSink),
            faults: Arc::new(TracingFaultSink),
            config: WishlistConfig::default(),
        }
    }

    /// Sets the notification sink (default: [`TracingSink`]).
    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets the decode fault sink (default: [`TracingFaultSink`]).
    pub fn faults(mut self, faults: Arc<dyn FaultSink>) -> Self {
        self.faults = faults;
        self
    }

    /// Sets the configuration.
    pub fn config(mut self, config: WishlistConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the wishlist and subscribes it to the current identity.
    ///
    /// The mirror follows identity changes from then on.
    pub async fn start<E: EntityCodec>(self) -> Wishlist<E> {
        let mirror = CollectionMirror::with_fault_sink(
            Arc::clone(&self.store),
            self.config.clone(),
            Arc::clone(&self.faults),
        );
        mirror.follow(self.identity.as_ref()).await;

        Wishlist {
            toggler: ToggleMutator::new(
                Arc::clone(&self.store),
                Arc::clone(&self.notifier),
                self.config.clone(),
            ),
            remover: RemovalMutator::new(
                Arc::clone(&self.store),
                Arc::clone(&self.notifier),
                self.config.clone(),
            ),
            store: self.store,
            identity: self.identity,
            faults: self.faults,
            config: self.config,
            mirror,
        }
    }
}

/// A wishlist bound to whoever the identity provider says is signed in.
///
/// Combines a [`CollectionMirror`] that follows the provider with the
/// toggle and removal mutators, all acting on the current identity.
pub struct Wishlist<E: EntityCodec> {
    store: Arc<dyn RemoteStore>,
    identity: Arc<dyn IdentityProvider>,
    faults: Arc<dyn FaultSink>,
    config: WishlistConfig,
    mirror: CollectionMirror<E>,
    toggler: ToggleMutator,
    remover: RemovalMutator,
}

impl<E: EntityCodec> Wishlist<E> {
    /// The underlying mirror.
    pub fn mirror(&self) -> &CollectionMirror<E> {
        &self.mirror
    }

    /// The current view of the collection.
    pub fn view(&self) -> CollectionView<E> {
        self.mirror.view()
    }

    /// Observes view changes.
    pub fn watch(&self) -> watch::Receiver<CollectionView<E>> {
        self.mirror.watch()
    }

    /// Toggles `entity` for the current identity.
    pub async fn toggle(&self, entity: &E) -> WishlistResult<ToggleOutcome> {
        self.toggler.toggle(&self.identity.current(), entity).await
    }

    /// Removes `id` for the current identity.
    pub async fn remove(&self, id: &EntityId) -> WishlistResult<()> {
        self.remover.remove(&self.identity.current(), id).await
    }

    /// Reads the whole collection once, bypassing the mirror.
    ///
    /// Undecodable records are skipped and reported to the fault sink.
    /// The anonymous identity reads as empty without contacting the store.
    pub async fn fetch(&self) -> WishlistResult<Vec<E>> {
        let Some(path) = self.config.collection_path(&self.identity.current())? else {
            return Ok(Vec::new());
        };
        let records = self.store.list_documents(&path).await?;

        let mut items = Vec::with_capacity(records.len());
        for record in records {
            match E::decode(record.id.clone(), &record.fields) {
                Ok(item) => items.push(item),
                Err(source) => self.faults.report(DecodeFault {
                    path: path.clone(),
                    error: WishlistError::Decode {
                        id: record.id,
                        source,
                    },
                }),
            }
        }
        Ok(items)
    }

    /// Reads one entity once, bypassing the mirror.
    ///
    /// # Errors
    ///
    /// - [`WishlistError::NotAuthenticated`] for the anonymous identity
    /// - [`WishlistError::Decode`] if the stored record is malformed
    pub async fn get(&self, id: &EntityId) -> WishlistResult<Option<E>> {
        let path = self.config.document_path(&self.identity.current(), id)?;
        match self.store.get_document(&path).await? {
            None => Ok(None),
            Some(record) => E::decode(record.id.clone(), &record.fields)
                .map(Some)
                .map_err(|source| WishlistError::Decode {
                    id: record.id,
                    source,
                }),
        }
    }
}
