//! # WishSync Testkit
//!
//! Test utilities for WishSync.
//!
//! This crate provides:
//! - Fixtures: products, paths and identities used across test suites
//! - Recording sinks that capture notifications and decode faults
//! - [`ScriptedStore`]: a store whose snapshot delivery is driven by the test
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wishsync_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn toggles() {
//!     let sink = RecordingSink::new();
//!     // ... build mutators with sink.clone()
//!     assert_eq!(sink.count(), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod scripted;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::scripted::*;
}

pub use fixtures::*;
pub use generators::*;
pub use scripted::*;
