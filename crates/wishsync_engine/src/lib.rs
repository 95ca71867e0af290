//! # WishSync Engine
//!
//! Keeps a local, reactive mirror of a per-account wishlist consistent
//! with a live-updating remote store, and mutates that store with a
//! toggle (add-if-absent / remove-if-present) and an idempotent remove.
//!
//! This crate provides:
//! - [`CollectionMirror`]: subscription lifecycle keyed by a changing identity
//! - [`ToggleMutator`] and [`RemovalMutator`]: mutations with one outcome
//!   and one notification per call
//! - [`Wishlist`]: a facade binding both to an [`IdentityProvider`]
//!
//! ## Architecture
//!
//! ```text
//! IdentityProvider ──identity──▶ CollectionMirror ◀──snapshots── RemoteStore
//!                                      │                            ▲
//!                                 CollectionView                    │
//!                                                 ToggleMutator ────┤
//!                                                 RemovalMutator ───┘
//! ```
//!
//! Mutators and mirrors never talk to each other. A mutation becomes
//! visible only when the store delivers the next snapshot.
//!
//! ## Key Invariants
//!
//! - At most one live subscription per mirror
//! - Snapshots replace the view; they are never merged
//! - No view update after teardown
//! - The anonymous identity never contacts the store
//! - A bad record is dropped, never the whole snapshot
//! - Consistency between mutators and mirrors is eventual (last write wins)

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod identity;
mod mirror;
mod mutate;
mod notify;
mod view;
mod wishlist;

pub use config::{Messages, WishlistConfig};
pub use error::{WishlistError, WishlistResult};
pub use identity::{AccountId, Identity, IdentityProvider, SessionIdentity};
pub use mirror::CollectionMirror;
pub use mutate::{RemovalMutator, ToggleMutator, ToggleOutcome};
pub use notify::{DecodeFault, FaultSink, NotificationSink, NullSink, TracingFaultSink, TracingSink};
pub use view::CollectionView;
pub use wishlist::{Wishlist, WishlistBuilder};
