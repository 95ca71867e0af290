//! The reactive collection view exposed by a mirror.

use crate::error::WishlistError;
use wishsync_codec::{EntityCodec, EntityId};

/// What a mirror currently knows about its collection.
///
/// A view is replaced wholesale on every snapshot; it is never merged with
/// the previous one. `error` distinguishes "confirmed empty" (`items`
/// empty, no error) from "unknown or broken" (`error` set).
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionView<E> {
    /// Successfully decoded entities, in snapshot order.
    pub items: Vec<E>,
    /// True until the first snapshot or failure of the current subscription.
    pub is_loading: bool,
    /// Why the collection is unknown or stale, if it is.
    pub error: Option<WishlistError>,
}

impl<E> CollectionView<E> {
    /// A view waiting for its first snapshot.
    pub fn loading() -> Self {
        Self {
            items: Vec::new(),
            is_loading: true,
            error: None,
        }
    }

    /// A settled, confirmed-empty view.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }

    /// A settled view holding `items`.
    pub fn ready(items: Vec<E>) -> Self {
        Self {
            items,
            is_loading: false,
            error: None,
        }
    }

    /// A settled view that failed.
    pub fn failed(error: WishlistError) -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: Some(error),
        }
    }

    /// Number of items (the badge count).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the view holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if the view has settled without error.
    pub fn is_ready(&self) -> bool {
        !self.is_loading && self.error.is_none()
    }
}

impl<E: EntityCodec> CollectionView<E> {
    /// Looks up an item by id.
    pub fn get(&self, id: &EntityId) -> Option<&E> {
        self.items.iter().find(|item| item.entity_id() == id)
    }

    /// Returns true if an item with this id is present.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of all items, in order.
    pub fn ids(&self) -> Vec<&EntityId> {
        self.items.iter().map(EntityCodec::entity_id).collect()
    }
}

impl<E> Default for CollectionView<E> {
    fn default() -> Self {
        Self::loading()
    }
}
