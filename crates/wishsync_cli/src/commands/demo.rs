//! Demo command implementation.
//!
//! Drives one wishlist through a whole session: a signed-out toggle that
//! is refused, sign-in, add, toggle off, add and remove, sign-out. Every
//! step waits for the mirror to catch up before printing.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use wishsync_codec::{EntityId, Product};
use wishsync_engine::{
    AccountId, CollectionView, SessionIdentity, Wishlist, WishlistBuilder, WishlistConfig,
};
use wishsync_store::MemoryStore;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Waits until the view satisfies `predicate` and returns it.
async fn settle(
    rx: &mut watch::Receiver<CollectionView<Product>>,
    predicate: impl FnMut(&CollectionView<Product>) -> bool,
) -> Result<CollectionView<Product>, Box<dyn std::error::Error>> {
    let view = timeout(SETTLE_TIMEOUT, rx.wait_for(predicate)).await??;
    Ok(view.clone())
}

fn print_view(label: &str, view: &CollectionView<Product>) {
    let names: Vec<&str> = view.items.iter().map(|p| p.name.as_str()).collect();
    match &view.error {
        Some(err) => println!("{label:<12} error: {err}"),
        None => println!("{label:<12} {} item(s) {:?}", view.len(), names),
    }
}

/// Runs the demo command.
pub async fn run(
    store: Arc<MemoryStore>,
    config: WishlistConfig,
    account: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let account = AccountId::new(account)?;
    let session = Arc::new(SessionIdentity::new());
    let wishlist: Wishlist<Product> = WishlistBuilder::new(store, session.clone())
        .config(config)
        .start()
        .await;
    let mut rx = wishlist.watch();

    print_view("signed out", &wishlist.view());
    let shoe = Product::new(EntityId::generate(), "Shoe")
        .with_price(59.5)
        .with_category("footwear");
    if let Err(err) = wishlist.toggle(&shoe).await {
        println!("{:<12} toggle refused: {err}", "signed out");
    }

    rx.borrow_and_update();
    session.sign_in(account.clone());
    timeout(SETTLE_TIMEOUT, rx.changed()).await??;
    let view = settle(&mut rx, |v| v.is_ready()).await?;
    print_view(&format!("as {}", account.as_str()), &view);

    let outcome = wishlist.toggle(&shoe).await?;
    let view = settle(&mut rx, |v| v.contains(&shoe.id)).await?;
    print_view(&format!("{outcome:?}"), &view);

    let outcome = wishlist.toggle(&shoe).await?;
    let view = settle(&mut rx, |v| !v.contains(&shoe.id)).await?;
    print_view(&format!("{outcome:?}"), &view);

    let hat = Product::new(EntityId::generate(), "Hat").with_price(12.0);
    wishlist.toggle(&hat).await?;
    settle(&mut rx, |v| v.contains(&hat.id)).await?;
    wishlist.remove(&hat.id).await?;
    let view = settle(&mut rx, |v| !v.contains(&hat.id)).await?;
    print_view("removed", &view);

    rx.borrow_and_update();
    session.sign_out();
    timeout(SETTLE_TIMEOUT, rx.changed()).await??;
    let view = settle(&mut rx, |v| v.is_ready()).await?;
    print_view("signed out", &view);

    Ok(())
}
