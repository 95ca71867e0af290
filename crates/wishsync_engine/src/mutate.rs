//! Toggle and removal mutations.
//!
//! Mutators write to the store directly and never touch a mirror; their
//! effects reach callers through the next snapshot. Every call produces
//! exactly one typed outcome and exactly one notification.
//!
//! # Race policy
//!
//! [`ToggleMutator::toggle`] checks for the document, then writes. The two
//! steps are not atomic: two sessions of the same account toggling the
//! same entity at once may both add or both delete, and the store's last
//! write decides the final state. No lock closes this window.

use crate::config::WishlistConfig;
use crate::error::{WishlistError, WishlistResult};
use crate::identity::Identity;
use crate::notify::NotificationSink;
use std::sync::Arc;
use tracing::{debug, warn};
use wishsync_codec::{EntityCodec, EntityId};
use wishsync_store::{DocumentPath, RemoteStore, StoreError};

/// What a successful toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The entity was absent and has been written.
    Added,
    /// The entity was present and has been deleted.
    Removed,
}

/// Deletes a document, treating a missing one as already deleted.
async fn delete_idempotent(store: &dyn RemoteStore, path: &DocumentPath) -> WishlistResult<()> {
    match store.delete_document(path).await {
        Ok(()) | Err(StoreError::NotFound { .. }) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Sends the single failure notification for `err`.
fn notify_failure(notifier: &dyn NotificationSink, config: &WishlistConfig, err: &WishlistError) {
    match err {
        WishlistError::NotAuthenticated => notifier.error(&config.messages.login_required),
        _ => notifier.error(&config.messages.failed),
    }
}

/// Adds an entity if absent, removes it if present.
pub struct ToggleMutator {
    store: Arc<dyn RemoteStore>,
    notifier: Arc<dyn NotificationSink>,
    config: WishlistConfig,
}

impl ToggleMutator {
    /// Creates a toggle mutator.
    pub fn new(
        store: Arc<dyn RemoteStore>,
        notifier: Arc<dyn NotificationSink>,
        config: WishlistConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Toggles `entity` in `identity`'s collection.
    ///
    /// # Errors
    ///
    /// - [`WishlistError::NotAuthenticated`] for the anonymous identity; the
    ///   store is not contacted
    /// - [`WishlistError::RemoteUnavailable`] if the store fails either step
    pub async fn toggle<E: EntityCodec>(
        &self,
        identity: &Identity,
        entity: &E,
    ) -> WishlistResult<ToggleOutcome> {
        let result = self.apply(identity, entity).await;
        match &result {
            Ok(ToggleOutcome::Added) => self.notifier.success(&self.config.messages.added),
            Ok(ToggleOutcome::Removed) => self.notifier.warning(&self.config.messages.removed),
            Err(err) => {
                warn!(%identity, id = %entity.entity_id(), %err, "toggle failed");
                notify_failure(self.notifier.as_ref(), &self.config, err);
            }
        }
        result
    }

    async fn apply<E: EntityCodec>(
        &self,
        identity: &Identity,
        entity: &E,
    ) -> WishlistResult<ToggleOutcome> {
        let path = self.config.document_path(identity, entity.entity_id())?;

        // The store may change between this read and the write below.
        let existing = self.store.get_document(&path).await?;

        if existing.is_some() {
            delete_idempotent(self.store.as_ref(), &path).await?;
            debug!(%path, "toggled off");
            Ok(ToggleOutcome::Removed)
        } else {
            self.store.set_document(&path, entity.encode()).await?;
            debug!(%path, "toggled on");
            Ok(ToggleOutcome::Added)
        }
    }
}

/// Unconditionally removes an entity by id.
pub struct RemovalMutator {
    store: Arc<dyn RemoteStore>,
    notifier: Arc<dyn NotificationSink>,
    config: WishlistConfig,
}

impl RemovalMutator {
    /// Creates a removal mutator.
    pub fn new(
        store: Arc<dyn RemoteStore>,
        notifier: Arc<dyn NotificationSink>,
        config: WishlistConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Removes `id` from `identity`'s collection.
    ///
    /// Removing an id that is not present succeeds.
    ///
    /// # Errors
    ///
    /// - [`WishlistError::NotAuthenticated`] for the anonymous identity
    /// - [`WishlistError::RemoteUnavailable`] if the store fails the delete
    pub async fn remove(&self, identity: &Identity, id: &EntityId) -> WishlistResult<()> {
        let result = match self.config.document_path(identity, id) {
            Ok(path) => delete_idempotent(self.store.as_ref(), &path).await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(()) => {
                debug!(%identity, %id, "removed");
                self.notifier.success(&self.config.messages.removed);
            }
            Err(err) => {
                warn!(%identity, %id, %err, "remove failed");
                notify_failure(self.notifier.as_ref(), &self.config, err);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use wishsync_codec::Product;
    use wishsync_store::MemoryStore;

    #[derive(Default)]
    struct Errors(Mutex<Vec<String>>);

    impl NotificationSink for Errors {
        fn info(&self, _message: &str) {}
        fn success(&self, _message: &str) {}
        fn warning(&self, _message: &str) {}
        fn error(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
    }

    #[tokio::test]
    async fn delete_of_missing_document_is_ok() {
        let store = MemoryStore::new();
        let config = WishlistConfig::default();
        let path = config
            .document_path(
                &Identity::account("u1").unwrap(),
                &EntityId::parse("p1").unwrap(),
            )
            .unwrap();
        assert_eq!(delete_idempotent(&store, &path).await, Ok(()));
    }

    #[test]
    fn failure_message_depends_on_cause() {
        let sink = Errors::default();
        let config = WishlistConfig::default();

        notify_failure(&sink, &config, &WishlistError::NotAuthenticated);
        notify_failure(
            &sink,
            &config,
            &WishlistError::RemoteUnavailable(StoreError::unavailable("down")),
        );

        assert_eq!(
            *sink.0.lock(),
            vec!["Please login first.".to_string(), "Failed to update wishlist".to_string()]
        );
    }

    #[tokio::test]
    async fn toggle_round_trip_on_memory_store() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(Errors::default());
        let toggler = ToggleMutator::new(store.clone(), sink.clone(), WishlistConfig::default());
        let identity = Identity::account("u1").unwrap();
        let hat = Product::new(EntityId::parse("p1").unwrap(), "Hat");

        assert_eq!(toggler.toggle(&identity, &hat).await, Ok(ToggleOutcome::Added));
        assert_eq!(toggler.toggle(&identity, &hat).await, Ok(ToggleOutcome::Removed));
        assert!(sink.0.lock().is_empty());
        assert_eq!(store.stats().gets, 2);
    }
}
