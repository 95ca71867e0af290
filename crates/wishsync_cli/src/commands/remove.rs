//! Remove command implementation.

use std::sync::Arc;
use wishsync_codec::{EntityId, Product};
use wishsync_engine::{Wishlist, WishlistBuilder, WishlistConfig};
use wishsync_store::MemoryStore;

/// Runs the remove command. Removing an absent id succeeds.
pub async fn run(
    store: Arc<MemoryStore>,
    config: WishlistConfig,
    account: &str,
    id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = EntityId::parse(id)?;
    let wishlist: Wishlist<Product> = WishlistBuilder::new(store, super::session(account)?)
        .config(config)
        .start()
        .await;
    wishlist.remove(&id).await?;
    println!("removed {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn removing_absent_id_succeeds() {
        let store = Arc::new(MemoryStore::new());
        assert!(run(store, WishlistConfig::default(), "u1", "ghost").await.is_ok());
    }

    #[tokio::test]
    async fn rejects_invalid_ids() {
        let store = Arc::new(MemoryStore::new());
        assert!(run(store, WishlistConfig::default(), "u1", "a/b").await.is_err());
    }
}
