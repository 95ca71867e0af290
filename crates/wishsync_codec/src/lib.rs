//! # WishSync Codec
//!
//! Raw record model and entity codec for WishSync.
//!
//! The remote store speaks in [`RawRecord`]s: a document key plus an
//! ordered map of dynamic [`FieldValue`]s. Domain types implement
//! [`EntityCodec`] to move between that representation and a typed
//! entity.
//!
//! ## Codec Rules
//!
//! - The document key is the entity id; it is never duplicated into the fields
//! - Each record decodes independently of every other record
//! - Missing optional fields decode to one documented default
//! - `decode(id, encode(e)) == e` for every valid entity
//!
//! ## Usage
//!
//! ```
//! use wishsync_codec::{EntityCodec, EntityId, Product};
//!
//! let shoe = Product::new(EntityId::parse("p2").unwrap(), "Shoe");
//! let fields = shoe.encode();
//! let decoded = Product::decode(shoe.entity_id().clone(), &fields).unwrap();
//! assert_eq!(shoe, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod error;
mod product;
mod record;
mod value;

pub use entity::EntityCodec;
pub use error::{CodecError, CodecResult};
pub use product::Product;
pub use record::{EntityId, RawFields, RawRecord};
pub use value::FieldValue;
