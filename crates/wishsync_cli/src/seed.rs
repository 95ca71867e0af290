//! Seed files: every account's stored wishlist as one JSON object.
//!
//! ```json
//! { "u1": [ { "id": "p1", "fields": { "name": "Hat", "price": 12 } } ] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};
use wishsync_codec::RawRecord;
use wishsync_engine::{Identity, WishlistConfig, WishlistError};
use wishsync_store::{MemoryStore, RemoteStore, StoreError};

/// Account id to stored records.
pub type SeedFile = BTreeMap<String, Vec<RawRecord>>;

/// Errors reading or writing seed files.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The file could not be read or written.
    #[error("seed file {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid seed document.
    #[error("malformed seed file: {0}")]
    Json(#[from] serde_json::Error),

    /// An account key cannot address a collection.
    #[error("invalid account `{account}`: {source}")]
    Account {
        /// The offending key.
        account: String,
        /// Why it was rejected.
        #[source]
        source: WishlistError,
    },

    /// The store refused a read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn io_error(path: &Path, source: std::io::Error) -> SeedError {
    SeedError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Reads a seed file.
pub fn load(path: &Path) -> Result<SeedFile, SeedError> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes a seed file.
pub fn save(path: &Path, file: &SeedFile) -> Result<(), SeedError> {
    let text = serde_json::to_string_pretty(file)?;
    fs::write(path, text).map_err(|e| io_error(path, e))
}

/// Resolves an account key to its collection, skipping the signed-out sentinel.
fn collection(
    config: &WishlistConfig,
    account: &str,
) -> Result<Option<wishsync_store::CollectionPath>, SeedError> {
    let wrap = |source| SeedError::Account {
        account: account.to_string(),
        source,
    };
    let identity = Identity::parse(account).map_err(wrap)?;
    config.collection_path(&identity).map_err(wrap)
}

/// Loads every record of `file` into `store`. Returns the record count.
pub fn apply(store: &MemoryStore, file: &SeedFile, config: &WishlistConfig) -> Result<usize, SeedError> {
    let mut count = 0;
    for (account, records) in file {
        let Some(path) = collection(config, account)? else {
            warn!(account = %account, "skipping records of the signed-out sentinel");
            continue;
        };
        for record in records {
            store.seed(&path, record.clone());
            count += 1;
        }
    }
    debug!(count, accounts = file.len(), "seed applied");
    Ok(count)
}

/// Reads the current collections of `accounts` back out of `store`.
pub async fn dump<'a>(
    store: &MemoryStore,
    config: &WishlistConfig,
    accounts: impl IntoIterator<Item = &'a str>,
) -> Result<SeedFile, SeedError> {
    let mut file = SeedFile::new();
    for account in accounts {
        if file.contains_key(account) {
            continue;
        }
        let Some(path) = collection(config, account)? else {
            continue;
        };
        let records = store.list_documents(&path).await?;
        file.insert(account.to_string(), records);
    }
    Ok(file)
}
