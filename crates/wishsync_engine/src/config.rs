//! Configuration for the wishlist engine.

use crate::error::{WishlistError, WishlistResult};
use crate::identity::Identity;
use wishsync_codec::EntityId;
use wishsync_store::{CollectionPath, DocumentPath};

/// Texts handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    /// Toggle added the entity.
    pub added: String,
    /// Toggle or remove deleted the entity.
    pub removed: String,
    /// The store rejected or failed a mutation.
    pub failed: String,
    /// A mutation was attempted while signed out.
    pub login_required: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            added: "Product added to wishlist".into(),
            removed: "Product removed from wishlist".into(),
            failed: "Failed to update wishlist".into(),
            login_required: "Please login first.".into(),
        }
    }
}

/// Configuration for mirrors and mutators.
#[derive(Debug, Clone)]
pub struct WishlistConfig {
    /// First path segment, above the account id.
    pub root: String,
    /// Name of the per-account sub-collection.
    pub collection: String,
    /// Notification texts.
    pub messages: Messages,
}

impl WishlistConfig {
    /// Creates the default configuration: `/accounts/{identity}/wishlist`.
    pub fn new() -> Self {
        Self {
            root: "accounts".into(),
            collection: "wishlist".into(),
            messages: Messages::default(),
        }
    }

    /// Sets the root segment.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Sets the notification texts.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Resolves the collection an identity mirrors.
    ///
    /// Returns `Ok(None)` for the anonymous identity, which has no remote
    /// collection at all.
    pub fn collection_path(&self, identity: &Identity) -> WishlistResult<Option<CollectionPath>> {
        let Some(account) = identity.account_id() else {
            return Ok(None);
        };
        CollectionPath::new(&self.root, account.as_str(), &self.collection)
            .map(Some)
            .map_err(|e| WishlistError::Config(e.to_string()))
    }

    /// Resolves the document path for one entity of an identity.
    ///
    /// Fails with [`WishlistError::NotAuthenticated`] for the anonymous
    /// identity.
    pub fn document_path(&self, identity: &Identity, id: &EntityId) -> WishlistResult<DocumentPath> {
        self.collection_path(identity)?
            .map(|collection| collection.document(id))
            .ok_or(WishlistError::NotAuthenticated)
    }
}

impl Default for WishlistConfig {
    fn default() -> Self {
        Self::new()
    }
}
