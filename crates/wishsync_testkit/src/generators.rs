//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data that maintains
//! the invariants the engine relies on (valid keys, unique ids).

use proptest::prelude::*;
use std::collections::BTreeMap;
use wishsync_codec::{EntityId, Product, RawRecord};

use crate::fixtures::{corrupt_record, product_record};

/// Strategy for generating valid entity ids.
pub fn entity_id_strategy() -> impl Strategy<Value = EntityId> {
    prop::string::string_regex("[a-zA-Z0-9_-]{1,24}")
        .expect("Invalid regex")
        .prop_map(|s| EntityId::parse(s).expect("regex yields valid ids"))
}

/// Strategy for generating valid account ids (never the sentinel).
pub fn account_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,15}").expect("Invalid regex")
}

/// Strategy for generating valid products with finite prices.
pub fn product_strategy() -> impl Strategy<Value = Product> {
    (
        entity_id_strategy(),
        ".{0,32}",
        -1.0e9f64..1.0e9,
        ".{0,64}",
        proptest::option::of("[a-z:/.]{1,40}"),
        proptest::option::of("[a-z]{1,12}"),
    )
        .prop_map(|(id, name, price, description, image_url, category)| Product {
            id,
            name,
            price,
            description,
            image_url,
            category,
        })
}

/// Strategy for one snapshot's worth of records with unique ids.
///
/// Each entry is `(record, decodable)`; roughly one in five records is
/// corrupt. Records come back sorted by id.
pub fn snapshot_records_strategy(max: usize) -> impl Strategy<Value = Vec<(RawRecord, bool)>> {
    prop::collection::btree_map(entity_id_strategy(), (".{0,16}", prop::bool::weighted(0.8)), 0..max)
        .prop_map(|entries: BTreeMap<EntityId, (String, bool)>| {
            entries
                .into_iter()
                .map(|(id, (name, decodable))| {
                    if decodable {
                        (product_record(&Product::new(id, name)), true)
                    } else {
                        (corrupt_record(id.as_str()), false)
                    }
                })
                .collect()
        })
}
