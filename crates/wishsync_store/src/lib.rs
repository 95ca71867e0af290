//! # WishSync Store
//!
//! Remote document store abstraction for WishSync.
//!
//! The store is treated as an **opaque real-time document store**:
//! documents live at paths, collections can be read once or subscribed
//! to, and every subscription delivers whole-collection snapshots (never
//! diffs) until it is cancelled.
//!
//! ## Path Scheme
//!
//! - Collection: `/{root}/{owner}/{collection}`, e.g. `/accounts/u1/wishlist`
//! - Document: `/{root}/{owner}/{collection}/{id}`
//!
//! ## Available Stores
//!
//! - [`MemoryStore`] - In-process store for tests, demos and embedding
//!
//! ## Example
//!
//! ```rust
//! use wishsync_store::{CollectionPath, MemoryStore, RemoteStore, SnapshotEvent};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryStore::new();
//! let path = CollectionPath::new("accounts", "u1", "wishlist").unwrap();
//! let mut subscription = store.subscribe_collection(&path).await.unwrap();
//!
//! match subscription.next().await {
//!     Some(SnapshotEvent::Snapshot(snapshot)) => assert!(snapshot.records.is_empty()),
//!     other => panic!("unexpected event: {other:?}"),
//! }
//! subscription.cancel();
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod path;
mod remote;
mod subscription;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, StoreStats};
pub use path::{CollectionPath, DocumentPath};
pub use remote::RemoteStore;
pub use subscription::{
    subscription_channel, CancelHandle, Snapshot, SnapshotEvent, SnapshotSender, Subscription,
};
