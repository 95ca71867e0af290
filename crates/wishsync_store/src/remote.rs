//! Remote store trait definition.

use crate::error::StoreResult;
use crate::path::{CollectionPath, DocumentPath};
use crate::subscription::Subscription;
use async_trait::async_trait;
use std::sync::Arc;
use wishsync_codec::{RawFields, RawRecord};

/// An opaque real-time document store.
///
/// This trait abstracts the transport, allowing for different
/// implementations (a hosted document database, an in-memory store,
/// scripted stores for testing, etc.).
///
/// # Invariants
///
/// - Every call may suspend; none defines a timeout
/// - A subscription delivers whole-collection snapshots, never diffs
/// - Document keys are unique within a collection
/// - Writes are last-write-wins; no call is conditional
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Subscribes to a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription cannot be established, e.g.
    /// the path is not readable by the caller.
    async fn subscribe_collection(&self, path: &CollectionPath) -> StoreResult<Subscription>;

    /// Reads one document, returning `None` if it does not exist.
    async fn get_document(&self, path: &DocumentPath) -> StoreResult<Option<RawRecord>>;

    /// Reads every document in a collection once.
    async fn list_documents(&self, path: &CollectionPath) -> StoreResult<Vec<RawRecord>>;

    /// Creates or replaces a document.
    async fn set_document(&self, path: &DocumentPath, fields: RawFields) -> StoreResult<()>;

    /// Deletes a document.
    ///
    /// Stores may either succeed or return `StoreError::NotFound` for a
    /// missing document.
    async fn delete_document(&self, path: &DocumentPath) -> StoreResult<()>;
}

#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for Arc<S> {
    async fn subscribe_collection(&self, path: &CollectionPath) -> StoreResult<Subscription> {
        (**self).subscribe_collection(path).await
    }

    async fn get_document(&self, path: &DocumentPath) -> StoreResult<Option<RawRecord>> {
        (**self).get_document(path).await
    }

    async fn list_documents(&self, path: &CollectionPath) -> StoreResult<Vec<RawRecord>> {
        (**self).list_documents(path).await
    }

    async fn set_document(&self, path: &DocumentPath, fields: RawFields) -> StoreResult<()> {
        (**self).set_document(path, fields).await
    }

    async fn delete_document(&self, path: &DocumentPath) -> StoreResult<()> {
        (**self).delete_document(path).await
    }
}
