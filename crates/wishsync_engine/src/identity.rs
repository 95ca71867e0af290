//! Identities and the identity provider seam.

use crate::error::{WishlistError, WishlistResult};
use std::fmt;
use tokio::sync::watch;

/// Account key that scopes one private wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    /// Creates an account id.
    ///
    /// The sentinel value and anything that cannot be a path segment are
    /// rejected.
    pub fn new(id: impl Into<String>) -> WishlistResult<Self> {
        let id = id.into();
        if id.is_empty() || id == Identity::SENTINEL || id.contains('/') {
            return Err(WishlistError::InvalidIdentity(id));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who the current user is, if anyone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Identity {
    /// No authenticated user. Maps to an empty, inert collection.
    #[default]
    Anonymous,
    /// An authenticated account.
    Account(AccountId),
}

impl Identity {
    /// Wire value that identity sources use for "no user".
    pub const SENTINEL: &'static str = "0";

    /// Parses an identity string as handed out by an auth layer.
    ///
    /// The sentinel and the empty string map to [`Identity::Anonymous`].
    pub fn parse(raw: &str) -> WishlistResult<Self> {
        if raw.is_empty() || raw == Self::SENTINEL {
            return Ok(Identity::Anonymous);
        }
        AccountId::new(raw).map(Identity::Account)
    }

    /// Shorthand for an authenticated identity.
    pub fn account(id: impl Into<String>) -> WishlistResult<Self> {
        AccountId::new(id).map(Identity::Account)
    }

    /// Returns true for an authenticated identity.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Account(_))
    }

    /// Returns the account id, if authenticated.
    pub fn account_id(&self) -> Option<&AccountId> {
        match self {
            Identity::Anonymous => None,
            Identity::Account(id) => Some(id),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Anonymous => f.write_str(Self::SENTINEL),
            Identity::Account(id) => write!(f, "{id}"),
        }
    }
}

/// Source of the current identity, observable over time.
pub trait IdentityProvider: Send + Sync {
    /// Returns the current identity.
    fn current(&self) -> Identity;

    /// Returns true if the current identity is authenticated.
    fn is_authenticated(&self) -> bool {
        self.current().is_authenticated()
    }

    /// Returns a receiver that observes identity changes.
    fn watch(&self) -> watch::Receiver<Identity>;
}

/// An in-process identity source driven by explicit sign-in and sign-out.
#[derive(Debug)]
pub struct SessionIdentity {
    tx: watch::Sender<Identity>,
}

impl SessionIdentity {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Identity::Anonymous);
        Self { tx }
    }

    /// Creates a session already signed in to `account`.
    pub fn signed_in(account: AccountId) -> Self {
        let (tx, _) = watch::channel(Identity::Account(account));
        Self { tx }
    }

    /// Switches to `account`. Observers are notified only on change.
    pub fn sign_in(&self, account: AccountId) {
        self.set(Identity::Account(account));
    }

    /// Signs out. Observers are notified only on change.
    pub fn sign_out(&self) {
        self.set(Identity::Anonymous);
    }

    fn set(&self, identity: Identity) {
        self.tx.send_if_modified(|current| {
            if *current == identity {
                false
            } else {
                *current = identity;
                true
            }
        });
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for SessionIdentity {
    fn current(&self) -> Identity {
        self.tx.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<Identity> {
        self.tx.subscribe()
    }
}
