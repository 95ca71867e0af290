//! Test fixtures and recording sinks.
//!
//! Provides the identities, paths and products the test suites share,
//! plus sinks that record what the engine told the outside world.

use parking_lot::Mutex;
use std::sync::Arc;
use wishsync_codec::{EntityCodec, EntityId, FieldValue, Product, RawFields, RawRecord};
use wishsync_engine::{DecodeFault, FaultSink, Identity, NotificationSink};
use wishsync_store::CollectionPath;

/// Parses an entity id, panicking on invalid input.
pub fn id(raw: &str) -> EntityId {
    EntityId::parse(raw).expect("valid entity id")
}

/// An authenticated identity.
pub fn account(raw: &str) -> Identity {
    Identity::account(raw).expect("valid account id")
}

/// The default wishlist path of an account.
pub fn wishlist_path(owner: &str) -> CollectionPath {
    CollectionPath::new("accounts", owner, "wishlist").expect("valid path")
}

/// A product with only a name.
pub fn product(raw_id: &str, name: &str) -> Product {
    Product::new(id(raw_id), name)
}

/// The stored form of a product.
pub fn product_record(product: &Product) -> RawRecord {
    RawRecord::new(product.entity_id().clone(), product.encode())
}

/// A stored record that no product can decode from (it has no name).
pub fn corrupt_record(raw_id: &str) -> RawRecord {
    RawRecord::new(
        id(raw_id),
        RawFields::from([("price".to_string(), FieldValue::Text("free".into()))]),
    )
}

/// Severity of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// `info`
    Info,
    /// `success`
    Success,
    /// `warning`
    Warning,
    /// `error`
    Error,
}

/// A captured notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: Level,
    /// Message text.
    pub message: String,
}

/// A notification sink that records every call.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far, oldest first.
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().clone()
    }

    /// Number of notifications so far.
    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    /// Number of notifications at `level`.
    pub fn count_level(&self, level: Level) -> usize {
        self.events.lock().iter().filter(|n| n.level == level).count()
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.events.lock().last().cloned()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, level: Level, message: &str) {
        self.events.lock().push(Notification {
            level,
            message: message.to_string(),
        });
    }
}

impl NotificationSink for RecordingSink {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.push(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// A fault sink that records every dropped record.
#[derive(Debug, Default, Clone)]
pub struct RecordingFaultSink {
    faults: Arc<Mutex<Vec<DecodeFault>>>,
}

impl RecordingFaultSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All faults so far, oldest first.
    pub fn faults(&self) -> Vec<DecodeFault> {
        self.faults.lock().clone()
    }

    /// Number of faults so far.
    pub fn count(&self) -> usize {
        self.faults.lock().len()
    }
}

impl FaultSink for RecordingFaultSink {
    fn report(&self, fault: DecodeFault) {
        self.faults.lock().push(fault);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_counts_levels() {
        let sink = RecordingSink::new();
        sink.success("added");
        sink.error("failed");
        sink.error("failed again");

        assert_eq!(sink.count(), 3);
        assert_eq!(sink.count_level(Level::Error), 2);
        assert_eq!(sink.last().unwrap().message, "failed again");

        sink.clear();
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn corrupt_record_does_not_decode() {
        let record = corrupt_record("bad");
        assert!(Product::decode(record.id, &record.fields).is_err());
    }
}
