//! Toggle command implementation.

use std::sync::Arc;
use wishsync_codec::{EntityId, Product};
use wishsync_engine::{ToggleOutcome, Wishlist, WishlistBuilder, WishlistConfig};
use wishsync_store::MemoryStore;

/// Runs the toggle command.
///
/// Without an explicit `id` a fresh one is generated, so the call always adds.
pub async fn run(
    store: Arc<MemoryStore>,
    config: WishlistConfig,
    account: &str,
    id: Option<String>,
    name: &str,
    price: f64,
) -> Result<ToggleOutcome, Box<dyn std::error::Error>> {
    let id = match id {
        Some(raw) => EntityId::parse(raw)?,
        None => EntityId::generate(),
    };
    let product = Product::new(id, name).with_price(price);

    let wishlist: Wishlist<Product> = WishlistBuilder::new(store, super::session(account)?)
        .config(config)
        .start()
        .await;
    let outcome = wishlist.toggle(&product).await?;

    let verb = match outcome {
        ToggleOutcome::Added => "added",
        ToggleOutcome::Removed => "removed",
    };
    println!("{} {} ({})", verb, product.name, product.id);
    Ok(outcome)
}
