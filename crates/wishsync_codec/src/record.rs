//! Entity identifiers and raw stored records.

use crate::error::{CodecError, CodecResult};
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The field map of a stored document.
pub type RawFields = BTreeMap<String, FieldValue>;

/// Identifier of an entity within one collection.
///
/// Entity ids double as document keys, so they are:
/// - Non-empty
/// - Free of `/` (which would escape into the path scheme)
/// - Unique within one identity's collection
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Parses an entity id, validating it as a document key.
    pub fn parse(id: impl Into<String>) -> CodecResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CodecError::InvalidId {
                id,
                reason: "id is empty",
            });
        }
        if id.contains('/') {
            return Err(CodecError::InvalidId {
                id,
                reason: "id contains a path separator",
            });
        }
        Ok(Self(id))
    }

    /// Generates a fresh random id for an entity created on this client.
    ///
    /// Uses UUID v4; the store may still reject a colliding key, but the
    /// collision probability is negligible.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityId {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A document as the remote store holds it: its key plus raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Document key (the entity id).
    pub id: EntityId,
    /// Stored fields.
    pub fields: RawFields,
}

impl RawRecord {
    /// Creates a raw record.
    pub fn new(id: EntityId, fields: RawFields) -> Self {
        Self { id, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_is_unique() {
        let id1 = EntityId::generate();
        let id2 = EntityId::generate();
        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(id1.as_str()).is_ok());
    }

    #[test]
    fn parse_rejects_bad_keys() {
        assert!(EntityId::parse("").is_err());
        assert!(matches!(
            EntityId::parse("a/b"),
            Err(CodecError::InvalidId { .. })
        ));
        assert_eq!(EntityId::parse("p1").unwrap().as_str(), "p1");
    }

    #[test]
    fn serde_validates() {
        let id: EntityId = serde_json::from_str(r#""p1""#).unwrap();
        assert_eq!(id.to_string(), "p1");
        assert!(serde_json::from_str::<EntityId>(r#""""#).is_err());
    }
}
