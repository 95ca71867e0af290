//! Entity codec trait.

use crate::error::CodecResult;
use crate::record::{EntityId, RawFields};

/// Trait for types that can be stored as documents in a collection.
///
/// Implementors must provide:
/// - `entity_id()`: Returns the stable entity identifier (the document key)
/// - `encode()`: Converts to raw fields, without the id
/// - `decode()`: Rebuilds the entity from its key and raw fields
///
/// # Laws
///
/// - `decode(e.entity_id().clone(), &e.encode()) == Ok(e)` for every valid `e`
/// - A record missing an optional field decodes to that field's documented
///   default; defaults are chosen inside `decode`, never by callers
///
/// # Example
///
/// ```rust
/// use wishsync_codec::{CodecError, CodecResult, EntityCodec, EntityId, FieldValue, RawFields};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Tag {
///     id: EntityId,
///     label: String,
/// }
///
/// impl EntityCodec for Tag {
///     fn entity_id(&self) -> &EntityId {
///         &self.id
///     }
///
///     fn encode(&self) -> RawFields {
///         RawFields::from([("label".to_string(), FieldValue::from(self.label.as_str()))])
///     }
///
///     fn decode(id: EntityId, fields: &RawFields) -> CodecResult<Self> {
///         let label = fields
///             .get("label")
///             .and_then(FieldValue::as_text)
///             .ok_or_else(|| CodecError::missing_field("label"))?;
///         Ok(Tag { id, label: label.to_string() })
///     }
/// }
/// ```
pub trait EntityCodec: Sized + Clone + Send + Sync + 'static {
    /// Returns the entity's identifier.
    fn entity_id(&self) -> &EntityId;

    /// Encodes the entity to raw document fields.
    fn encode(&self) -> RawFields;

    /// Decodes an entity from its document key and raw fields.
    fn decode(id: EntityId, fields: &RawFields) -> CodecResult<Self>;
}
