//! The product entity kept in wishlists.

use crate::entity::EntityCodec;
use crate::error::{CodecError, CodecResult};
use crate::record::{EntityId, RawFields};
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};

const NAME: &str = "name";
const PRICE: &str = "price";
const DESCRIPTION: &str = "description";
const IMAGE_URL: &str = "imageUrl";
const CATEGORY: &str = "category";
/// Written by older clients that spread the whole product into the document.
const LEGACY_ID: &str = "_id";

/// A catalog product as stored in a wishlist.
///
/// Field defaults when the stored document omits them (or stores null):
///
/// | field         | default |
/// |---------------|---------|
/// | `price`       | `0.0`   |
/// | `description` | `""`    |
/// | `image_url`   | `None`  |
/// | `category`    | `None`  |
///
/// `name` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id (document key).
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Unit price.
    #[serde(default)]
    pub price: f64,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Catalog category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    /// Creates a product with only the required fields; the rest take
    /// their documented defaults.
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price: 0.0,
            description: String::new(),
            image_url: None,
            category: None,
        }
    }

    /// Sets the price.
    ///
    /// The price must be finite: a NaN price never compares equal to
    /// itself, so such a product does not survive a decode/encode round trip.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the image location.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Returns the field unless it is absent or null.
fn present<'a>(fields: &'a RawFields, name: &str) -> Option<&'a FieldValue> {
    fields.get(name).filter(|v| !v.is_null())
}

fn optional_text(fields: &RawFields, name: &str) -> CodecResult<Option<String>> {
    match present(fields, name) {
        None => Ok(None),
        Some(FieldValue::Text(s)) => Ok(Some(s.clone())),
        Some(other) => Err(CodecError::wrong_type(name, "text", other.type_name())),
    }
}

impl EntityCodec for Product {
    fn entity_id(&self) -> &EntityId {
        &self.id
    }

    fn encode(&self) -> RawFields {
        let mut fields = RawFields::new();
        fields.insert(NAME.into(), FieldValue::from(self.name.as_str()));
        fields.insert(PRICE.into(), FieldValue::Double(self.price));
        fields.insert(DESCRIPTION.into(), FieldValue::from(self.description.as_str()));
        if let Some(url) = &self.image_url {
            fields.insert(IMAGE_URL.into(), FieldValue::from(url.as_str()));
        }
        if let Some(category) = &self.category {
            fields.insert(CATEGORY.into(), FieldValue::from(category.as_str()));
        }
        fields
    }

    fn decode(id: EntityId, fields: &RawFields) -> CodecResult<Self> {
        if let Some(embedded) = present(fields, LEGACY_ID) {
            let embedded = embedded
                .as_text()
                .ok_or_else(|| CodecError::wrong_type(LEGACY_ID, "text", embedded.type_name()))?;
            if embedded != id.as_str() {
                return Err(CodecError::IdMismatch {
                    key: id.to_string(),
                    embedded: embedded.to_string(),
                });
            }
        }

        let name = match present(fields, NAME) {
            None => return Err(CodecError::missing_field(NAME)),
            Some(FieldValue::Text(s)) => s.clone(),
            Some(other) => return Err(CodecError::wrong_type(NAME, "text", other.type_name())),
        };

        let price = match present(fields, PRICE) {
            None => 0.0,
            Some(v) => v
                .as_number()
                .ok_or_else(|| CodecError::wrong_type(PRICE, "number", v.type_name()))?,
        };

        Ok(Self {
            id,
            name,
            price,
            description: optional_text(fields, DESCRIPTION)?.unwrap_or_default(),
            image_url: optional_text(fields, IMAGE_URL)?,
            category: optional_text(fields, CATEGORY)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(s: &str) -> EntityId {
        EntityId::parse(s).unwrap()
    }

    #[test]
    fn roundtrip_full_product() {
        let product = Product::new(id("p1"), "Trail Runner")
            .with_price(89.99)
            .with_description("Lightweight")
            .with_image_url("https://cdn.example.com/p1.png")
            .with_category("shoes");
        let decoded = Product::decode(id("p1"), &product.encode()).unwrap();
        assert_eq!(decoded, product);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let fields = RawFields::from([(NAME.to_string(), FieldValue::from("Shoe"))]);
        let decoded = Product::decode(id("p2"), &fields).unwrap();
        assert_eq!(decoded, Product::new(id("p2"), "Shoe"));
        assert_eq!(decoded.price, 0.0);
        assert_eq!(decoded.description, "");
        assert_eq!(decoded.image_url, None);
    }

    #[test]
    fn null_optional_fields_use_defaults() {
        let fields = RawFields::from([
            (NAME.to_string(), FieldValue::from("Shoe")),
            (PRICE.to_string(), FieldValue::Null),
            (CATEGORY.to_string(), FieldValue::Null),
        ]);
        let decoded = Product::decode(id("p2"), &fields).unwrap();
        assert_eq!(decoded.price, 0.0);
        assert_eq!(decoded.category, None);
    }

    #[test]
    fn missing_name_fails() {
        let fields = RawFields::from([(PRICE.to_string(), FieldValue::from(5.0))]);
        assert_eq!(
            Product::decode(id("p3"), &fields),
            Err(CodecError::missing_field(NAME))
        );
    }

    #[test]
    fn wrong_type_fails() {
        let fields = RawFields::from([
            (NAME.to_string(), FieldValue::from("Shoe")),
            (PRICE.to_string(), FieldValue::from("cheap")),
        ]);
        assert!(matches!(
            Product::decode(id("p3"), &fields),
            Err(CodecError::WrongType { .. })
        ));
    }

    #[test]
    fn integer_price_is_widened() {
        let fields = RawFields::from([
            (NAME.to_string(), FieldValue::from("Shoe")),
            (PRICE.to_string(), FieldValue::Integer(40)),
        ]);
        assert_eq!(Product::decode(id("p4"), &fields).unwrap().price, 40.0);
    }

    #[test]
    fn legacy_embedded_id() {
        let mut fields = RawFields::from([(NAME.to_string(), FieldValue::from("Shoe"))]);
        fields.insert(LEGACY_ID.into(), FieldValue::from("p5"));
        assert!(Product::decode(id("p5"), &fields).is_ok());

        fields.insert(LEGACY_ID.into(), FieldValue::from("other"));
        assert!(matches!(
            Product::decode(id("p5"), &fields),
            Err(CodecError::IdMismatch { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let fields = RawFields::from([
            (NAME.to_string(), FieldValue::from("Shoe")),
            ("rating".to_string(), FieldValue::Integer(4)),
        ]);
        assert_eq!(
            Product::decode(id("p6"), &fields).unwrap(),
            Product::new(id("p6"), "Shoe")
        );
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            key in "[a-zA-Z0-9_-]{1,24}",
            name in ".{0,32}",
            price in -1.0e9f64..1.0e9,
            description in ".{0,64}",
            image_url in proptest::option::of("[a-z:/.]{1,40}"),
            category in proptest::option::of("[a-z]{1,12}"),
        ) {
            let product = Product {
                id: id(&key),
                name,
                price,
                description,
                image_url,
                category,
            };
            let decoded = Product::decode(product.id.clone(), &product.encode()).unwrap();
            prop_assert_eq!(decoded, product);
        }
    }
}
