//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a remote store can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The caller is not allowed to access the path.
    #[error("permission denied for {path}")]
    PermissionDenied {
        /// The denied path.
        path: String,
    },

    /// Network or transport failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The document does not exist.
    #[error("document not found: {path}")]
    NotFound {
        /// The missing document path.
        path: String,
    },

    /// A path segment is malformed.
    #[error("invalid path segment `{segment}`: {reason}")]
    InvalidPath {
        /// The rejected segment.
        segment: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl StoreError {
    /// Creates a permission error for a path.
    pub fn permission_denied(path: impl ToString) -> Self {
        Self::PermissionDenied {
            path: path.to_string(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Returns true if re-issuing the same call may succeed.
    ///
    /// Nothing in WishSync retries automatically; this only informs callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
