//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding a raw record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A required field is absent from the record.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },

    /// A field holds a value of the wrong type.
    #[error("field `{field}` has type {found}, expected {expected}")]
    WrongType {
        /// Name of the offending field.
        field: String,
        /// Expected type name.
        expected: &'static str,
        /// Type name actually found.
        found: &'static str,
    },

    /// An embedded id disagrees with the document key.
    #[error("embedded id `{embedded}` does not match document key `{key}`")]
    IdMismatch {
        /// Document key.
        key: String,
        /// Id stored inside the fields.
        embedded: String,
    },

    /// The entity id is not a valid document key.
    #[error("invalid entity id `{id}`: {reason}")]
    InvalidId {
        /// The rejected id.
        id: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl CodecError {
    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a wrong type error.
    pub fn wrong_type(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CodecError::missing_field("name");
        assert_eq!(err.to_string(), "missing required field `name`");

        let err = CodecError::wrong_type("price", "number", "text");
        assert!(err.to_string().contains("price"));
        assert!(err.to_string().contains("number"));
    }
}
