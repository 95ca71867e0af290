//! Notification and fault reporting seams.

use crate::error::WishlistError;
use tracing::{error, info, warn};
use wishsync_store::CollectionPath;

/// User-facing message surface (toasts, status bars, logs).
///
/// Calls are fire-and-forget; nothing the sink does feeds back into the
/// engine.
pub trait NotificationSink: Send + Sync {
    /// Neutral information.
    fn info(&self, message: &str);
    /// A mutation succeeded.
    fn success(&self, message: &str);
    /// Something the user may want to notice.
    fn warning(&self, message: &str);
    /// A mutation failed.
    fn error(&self, message: &str);
}

/// Writes notifications to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn info(&self, message: &str) {
        info!(target: "wishsync::notify", "{message}");
    }

    fn success(&self, message: &str) {
        info!(target: "wishsync::notify", success = true, "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(target: "wishsync::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "wishsync::notify", "{message}");
    }
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// A record dropped from a snapshot because it failed to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFault {
    /// Collection the record belongs to.
    pub path: CollectionPath,
    /// The decode failure (always [`WishlistError::Decode`]).
    pub error: WishlistError,
}

/// Out-of-band channel for per-record decode failures.
pub trait FaultSink: Send + Sync {
    /// Reports one dropped record.
    fn report(&self, fault: DecodeFault);
}

/// Logs faults at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFaultSink;

impl FaultSink for TracingFaultSink {
    fn report(&self, fault: DecodeFault) {
        warn!(path = %fault.path, error = %fault.error, "dropping undecodable record");
    }
}
