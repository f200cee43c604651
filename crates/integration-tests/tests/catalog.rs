//! Catalog fetching and search against the mock backend.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use reqwest::StatusCode;
use rust_decimal::Decimal;

use qkart_core::ProductId;
use qkart_integration_tests::MockBackend;
use qkart_storefront::{Operation, StorefrontClient, StorefrontError};

#[tokio::test]
async fn test_fetch_all_products_parses_backend_json() {
    let backend = MockBackend::start().await;
    let products = backend.client().fetch_all_products().await.unwrap();

    assert_eq!(products.len(), 4);
    let shoes = &products[0];
    assert_eq!(shoes.id, ProductId::new("BW0jAAeDJmlZCF8i"));
    assert_eq!(shoes.name, "UNIFACTOR Mens Running Shoes");
    assert_eq!(shoes.category, "Fashion");
    assert_eq!(shoes.cost.amount(), Decimal::new(50, 0));
    assert_eq!(shoes.rating.stars(), 5);
    assert!(shoes.image_url.starts_with("https://"));
}

#[tokio::test]
async fn test_catalog_is_cached() {
    let backend = MockBackend::start().await;
    let client = backend.client();

    let first = client.fetch_all_products().await.unwrap();
    let second = client.fetch_all_products().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(backend.request_count(), 1);

    client.invalidate_catalog().await;
    client.fetch_all_products().await.unwrap();
    assert_eq!(backend.request_count(), 2);
}

#[tokio::test]
async fn test_zero_ttl_disables_cache() {
    let backend = MockBackend::start().await;
    let mut config = backend.config();
    config.catalog_cache_ttl = Duration::ZERO;
    let client = StorefrontClient::new(config).unwrap();

    client.fetch_all_products().await.unwrap();
    client.fetch_all_products().await.unwrap();

    assert_eq!(backend.request_count(), 2);
}

#[tokio::test]
async fn test_search_matches_name_or_category() {
    let backend = MockBackend::start().await;
    let client = backend.client();

    let fashion = client.fetch_filtered_products("fashion").await.unwrap();
    assert_eq!(fashion.len(), 2);
    assert!(fashion.iter().all(|p| p.category == "Fashion"));

    let watch = client.fetch_filtered_products("Watch").await.unwrap();
    assert_eq!(watch.len(), 1);
    assert_eq!(watch[0].name, "The Minimalist Slim Leather Watch");

    assert_eq!(backend.search_queries(), vec!["fashion", "Watch"]);
}

#[tokio::test]
async fn test_search_without_matches_is_empty() {
    let backend = MockBackend::start().await;
    let products = backend
        .client()
        .fetch_filtered_products("xyz")
        .await
        .unwrap();

    assert!(products.is_empty());
}

#[tokio::test]
async fn test_blank_search_returns_full_catalog() {
    let backend = MockBackend::start().await;
    let products = backend
        .client()
        .fetch_filtered_products("   ")
        .await
        .unwrap();

    assert_eq!(products.len(), 4);
    assert!(backend.search_queries().is_empty());
}

#[tokio::test]
async fn test_server_error_uses_generic_message() {
    let backend = MockBackend::start().await;
    backend.fail_with(StatusCode::INTERNAL_SERVER_ERROR);

    let err = backend.client().fetch_all_products().await.unwrap_err();

    assert!(matches!(
        err,
        StorefrontError::Status(StatusCode::INTERNAL_SERVER_ERROR)
    ));
    assert_eq!(
        err.user_message(Operation::FetchProducts),
        "Error fetching products. Please try again later."
    );
}

#[tokio::test]
async fn test_search_server_error_uses_generic_message() {
    let backend = MockBackend::start().await;
    backend.fail_with(StatusCode::INTERNAL_SERVER_ERROR);

    let err = backend
        .client()
        .fetch_filtered_products("phone")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(
        err.user_message(Operation::SearchProducts),
        "Error fetching products. Please try again later."
    );
}
