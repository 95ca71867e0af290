//! Collection and document paths.

use crate::error::{StoreError, StoreResult};
use std::fmt;
use wishsync_codec::EntityId;

fn validate_segment(segment: &str) -> StoreResult<()> {
    if segment.is_empty() {
        return Err(StoreError::InvalidPath {
            segment: segment.to_string(),
            reason: "segment is empty",
        });
    }
    if segment.contains('/') {
        return Err(StoreError::InvalidPath {
            segment: segment.to_string(),
            reason: "segment contains a path separator",
        });
    }
    Ok(())
}

/// Path of a per-owner sub-collection: `/{root}/{owner}/{collection}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    root: String,
    owner: String,
    collection: String,
}

impl CollectionPath {
    /// Creates a collection path, validating each segment.
    pub fn new(
        root: impl Into<String>,
        owner: impl Into<String>,
        collection: impl Into<String>,
    ) -> StoreResult<Self> {
        let (root, owner, collection) = (root.into(), owner.into(), collection.into());
        validate_segment(&root)?;
        validate_segment(&owner)?;
        validate_segment(&collection)?;
        Ok(Self {
            root,
            owner,
            collection,
        })
    }

    /// Returns the owner segment.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the path of one document in this collection.
    pub fn document(&self, id: &EntityId) -> DocumentPath {
        DocumentPath {
            collection: self.clone(),
            id: id.clone(),
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}/{}", self.root, self.owner, self.collection)
    }
}

/// Path of a single document: `/{root}/{owner}/{collection}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: EntityId,
}

impl DocumentPath {
    /// Returns the containing collection.
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// Returns the document key.
    pub fn id(&self) -> &EntityId {
        &self.id
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}
