//! Show command implementation.

use serde::Serialize;
use std::sync::Arc;
use wishsync_codec::Product;
use wishsync_engine::{Wishlist, WishlistBuilder, WishlistConfig};
use wishsync_store::MemoryStore;

/// An account's wishlist as printed.
#[derive(Debug, Serialize)]
pub struct ShowResult {
    /// Account id.
    pub account: String,
    /// Number of products (the badge count).
    pub count: usize,
    /// Total price of all products.
    pub total: f64,
    /// The products, in store order.
    pub items: Vec<Product>,
}

/// Reads an account's wishlist once.
pub async fn collect(
    store: Arc<MemoryStore>,
    config: WishlistConfig,
    account: &str,
) -> Result<ShowResult, Box<dyn std::error::Error>> {
    let wishlist: Wishlist<Product> = WishlistBuilder::new(store, super::session(account)?)
        .config(config)
        .start()
        .await;
    let items = wishlist.fetch().await?;

    Ok(ShowResult {
        account: account.to_string(),
        count: items.len(),
        total: items.iter().map(|p| p.price).sum(),
        items,
    })
}

/// Runs the show command.
pub async fn run(
    store: Arc<MemoryStore>,
    config: WishlistConfig,
    account: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = collect(store, config, account).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => print_text_output(&result),
    }

    Ok(())
}

fn print_text_output(result: &ShowResult) {
    println!("Wishlist of {} ({} items)", result.account, result.count);
    for product in &result.items {
        print!("  {:<38} {:<24} {:>10.2}", product.id.as_str(), product.name, product.price);
        if let Some(category) = &product.category {
            print!("  [{category}]");
        }
        println!();
    }
    println!("Total: {:.2}", result.total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wishsync_codec::{EntityCodec, EntityId, RawRecord};

    #[tokio::test]
    async fn collects_decoded_items() {
        let store = Arc::new(MemoryStore::new());
        let config = WishlistConfig::default();
        let path = config
            .collection_path(&wishsync_engine::Identity::account("u1").unwrap())
            .unwrap()
            .unwrap();
        for (id, name, price) in [("p1", "Hat", 12.0), ("p2", "Shoe", 59.5)] {
            let product = Product::new(EntityId::parse(id).unwrap(), name).with_price(price);
            store.seed(&path, RawRecord::new(product.id.clone(), product.encode()));
        }

        let result = collect(store, config, "u1").await.unwrap();

        assert_eq!(result.count, 2);
        assert!((result.total - 71.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn rejects_the_sentinel_account() {
        let store = Arc::new(MemoryStore::new());
        assert!(collect(store, WishlistConfig::default(), "0").await.is_err());
    }
}
