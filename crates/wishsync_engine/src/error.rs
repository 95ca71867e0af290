//! Error types for the wishlist engine.

use thiserror::Error;
use wishsync_codec::{CodecError, EntityId};
use wishsync_store::StoreError;

/// Result type for wishlist operations.
pub type WishlistResult<T> = Result<T, WishlistError>;

/// Errors that can occur while mirroring or mutating a wishlist.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WishlistError {
    /// A mutation was attempted without an authenticated identity.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Network, permission or transport failure reported by the store.
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(#[from] StoreError),

    /// A stored record could not be decoded into an entity.
    #[error("could not decode record {id}: {source}")]
    Decode {
        /// Document key of the record.
        id: EntityId,
        /// Codec failure.
        #[source]
        source: CodecError,
    },

    /// A snapshot reached the mirror after its subscription was torn down.
    ///
    /// The update is discarded; surfacing this anywhere else is a bug.
    #[error("snapshot observed after subscription teardown")]
    StaleSubscriptionUpdate,

    /// An identity string is not usable as an account key.
    #[error("invalid identity `{0}`")]
    InvalidIdentity(String),

    /// The path configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl WishlistError {
    /// Returns true if the failure came from the remote store.
    pub fn is_remote(&self) -> bool {
        matches!(self, WishlistError::RemoteUnavailable(_))
    }
}
