//! CLI command implementations.

pub mod demo;
pub mod remove;
pub mod show;
pub mod toggle;

use std::sync::Arc;
use wishsync_engine::{AccountId, SessionIdentity};

/// A session signed in to `account`.
fn session(account: &str) -> Result<Arc<SessionIdentity>, wishsync_engine::WishlistError> {
    Ok(Arc::new(SessionIdentity::signed_in(AccountId::new(account)?)))
}
