//! Integration tests for the cart file shared between processes.
//!
//! A second `CartStore` over the same directory stands in for the CLI or a
//! second storefront.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::http::StatusCode;
use warung_core::cart::FileStorage;
use warung_core::{CartStorage, CartStore, ClosePolicy, Price};
use warung_integration_tests::TestContext;
use warung_storefront::sync::sync_once;

#[tokio::test]
async fn test_corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    FileStorage::new(dir.path())
        .write("cart", "{not json")
        .unwrap();

    let ctx = TestContext::in_dir(dir, ClosePolicy::default());
    let page = ctx.get("/cart").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Keranjang masih kosong"));

    // The first change replaces the corrupt file.
    ctx.post_htmx("/cart/add", "handle=hot-dog").await;
    assert_eq!(ctx.persisted().unwrap()[0]["name"], "Hot Dog");
}

#[tokio::test]
async fn test_invalid_records_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    FileStorage::new(dir.path())
        .write(
            "cart",
            r#"[
                {"id": 1, "name": "Burger", "unitPrice": 25000, "quantity": 2},
                {"id": 2, "name": "", "price": 8000, "quantity": 1},
                {"id": 3, "name": "Soda", "price": 8000, "quantity": 0},
                {"id": 1, "name": "Fries", "price": 12000, "quantity": 1}
            ]"#,
        )
        .unwrap();

    let ctx = TestContext::in_dir(dir, ClosePolicy::default());
    let store = ctx.state.cart().unwrap();
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.total(), Price::new(50_000));
}

#[tokio::test]
async fn test_external_change_is_picked_up() {
    let ctx = TestContext::new();
    ctx.post_htmx("/cart/add", "handle=burger").await;

    let mut last_seen = None;
    assert!(!sync_once(&ctx.state, &ctx.storage, &mut last_seen));

    // Another process adds to the same cart file.
    let mut other = CartStore::open(Arc::new(FileStorage::new(ctx.dir.path())));
    other.add("Milkshake", Price::new(18_000)).unwrap();

    assert!(sync_once(&ctx.state, &ctx.storage, &mut last_seen));
    let page = ctx.get("/cart").await;
    assert!(page.body.contains("Milkshake"));
    assert!(page.body.contains("IDR 43.000"));
}

#[tokio::test]
async fn test_external_clear_is_picked_up() {
    let ctx = TestContext::new();
    ctx.post_htmx("/cart/add", "handle=burger").await;
    let mut last_seen = None;
    sync_once(&ctx.state, &ctx.storage, &mut last_seen);

    let mut other = CartStore::open(Arc::new(FileStorage::new(ctx.dir.path())));
    other.clear().unwrap();

    assert!(sync_once(&ctx.state, &ctx.storage, &mut last_seen));
    assert!(ctx.state.cart().unwrap().cart().is_empty());
}

#[tokio::test]
async fn test_ids_stay_unique_across_stores() {
    let ctx = TestContext::new();
    ctx.post_htmx("/cart/add", "handle=burger").await;

    let mut other = CartStore::open(Arc::new(FileStorage::new(ctx.dir.path())));
    other.add("Soda", Price::new(8_000)).unwrap();
    other.add("Fries", Price::new(12_000)).unwrap();

    let ids: Vec<i64> = ctx
        .persisted()
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}
