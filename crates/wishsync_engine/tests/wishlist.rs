//! Integration tests for the identity-bound wishlist facade.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use wishsync_codec::Product;
use wishsync_engine::{
    AccountId, CollectionView, SessionIdentity, ToggleOutcome, Wishlist, WishlistBuilder,
    WishlistError,
};
use wishsync_store::{MemoryStore, StoreError};
use wishsync_testkit::prelude::*;

struct App {
    store: Arc<MemoryStore>,
    session: Arc<SessionIdentity>,
    sink: RecordingSink,
    faults: RecordingFaultSink,
    wishlist: Wishlist<Product>,
}

async fn app(signed_in: Option<&str>) -> App {
    let store = Arc::new(MemoryStore::new());
    let session = Arc::new(match signed_in {
        Some(owner) => SessionIdentity::signed_in(AccountId::new(owner).unwrap()),
        None => SessionIdentity::new(),
    });
    let sink = RecordingSink::new();
    let faults = RecordingFaultSink::new();
    let wishlist = WishlistBuilder::new(store.clone(), session.clone())
        .notifier(Arc::new(sink.clone()))
        .faults(Arc::new(faults.clone()))
        .start()
        .await;
    App {
        store,
        session,
        sink,
        faults,
        wishlist,
    }
}

async fn until(
    wishlist: &Wishlist<Product>,
    predicate: impl FnMut(&CollectionView<Product>) -> bool,
) -> CollectionView<Product> {
    let mut rx = wishlist.watch();
    let view = timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("view did not settle in time")
        .expect("mirror dropped")
        .clone();
    view
}

#[tokio::test]
async fn signed_in_user_toggles_through_the_facade() {
    let app = app(Some("u1")).await;
    until(&app.wishlist, |v| v.is_ready()).await;

    let shoe = product("p2", "Shoe").with_price(59.5);
    assert_eq!(app.wishlist.toggle(&shoe).await, Ok(ToggleOutcome::Added));

    let view = until(&app.wishlist, |v| v.len() == 1).await;
    assert_eq!(view.get(&id("p2")), Some(&shoe));
    assert_eq!(app.sink.count_level(Level::Success), 1);

    assert_eq!(app.wishlist.toggle(&shoe).await, Ok(ToggleOutcome::Removed));
    until(&app.wishlist, |v| v.is_empty()).await;
}

#[tokio::test]
async fn signed_out_user_sees_empty_and_cannot_mutate() {
    let app = app(None).await;

    assert_eq!(app.wishlist.view(), CollectionView::empty());
    assert_eq!(
        app.wishlist.toggle(&product("p1", "Hat")).await,
        Err(WishlistError::NotAuthenticated)
    );
    assert_eq!(
        app.wishlist.remove(&id("p1")).await,
        Err(WishlistError::NotAuthenticated)
    );
    assert_eq!(app.wishlist.fetch().await, Ok(Vec::new()));
    assert_eq!(app.store.stats().total(), 0);
    assert_eq!(app.sink.count_level(Level::Error), 2);
}

#[tokio::test]
async fn switching_accounts_switches_collections() {
    let app = app(Some("u1")).await;
    app.store
        .seed(&wishlist_path("u2"), product_record(&product("p9", "Scarf")));
    app.wishlist.toggle(&product("p1", "Hat")).await.unwrap();
    until(&app.wishlist, |v| v.contains(&id("p1"))).await;

    app.session.sign_in(AccountId::new("u2").unwrap());
    let view = until(&app.wishlist, |v| v.contains(&id("p9"))).await;
    assert!(!view.contains(&id("p1")));
    assert_eq!(app.store.subscriber_count(&wishlist_path("u1")), 0);

    app.wishlist.toggle(&product("p3", "Glove")).await.unwrap();
    assert_eq!(app.store.document_count(&wishlist_path("u2")), 2);
    assert_eq!(app.store.document_count(&wishlist_path("u1")), 1);
}

#[tokio::test]
async fn fetch_skips_and_reports_bad_records() {
    let app = app(Some("u1")).await;
    let path = wishlist_path("u1");
    app.store.seed(&path, product_record(&product("p1", "Hat")));
    app.store.seed(&path, corrupt_record("p2"));

    let items = app.wishlist.fetch().await.unwrap();

    assert_eq!(items, vec![product("p1", "Hat")]);
    assert!(app
        .faults
        .faults()
        .iter()
        .any(|f| matches!(&f.error, WishlistError::Decode { id, .. } if id.as_str() == "p2")));
}

#[tokio::test]
async fn fetch_surfaces_store_failures() {
    let app = app(Some("u1")).await;
    app.store.deny(&wishlist_path("u1"));

    assert!(matches!(
        app.wishlist.fetch().await,
        Err(WishlistError::RemoteUnavailable(StoreError::PermissionDenied { .. }))
    ));
}

#[tokio::test]
async fn get_reads_one_entity() {
    let app = app(Some("u1")).await;
    let path = wishlist_path("u1");
    let hat = product("p1", "Hat").with_category("apparel");
    app.store.seed(&path, product_record(&hat));
    app.store.seed(&path, corrupt_record("p2"));

    assert_eq!(app.wishlist.get(&id("p1")).await, Ok(Some(hat)));
    assert_eq!(app.wishlist.get(&id("missing")).await, Ok(None));
    assert!(matches!(
        app.wishlist.get(&id("p2")).await,
        Err(WishlistError::Decode { .. })
    ));
}

#[tokio::test]
async fn dropping_the_wishlist_releases_its_subscription() {
    let app = app(Some("u1")).await;
    let path = wishlist_path("u1");
    assert_eq!(app.store.subscriber_count(&path), 1);

    let App { store, wishlist, .. } = app;
    drop(wishlist);

    assert_eq!(store.subscriber_count(&path), 0);
}
