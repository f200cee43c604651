//! Debounced search driving the real client.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use qkart_integration_tests::MockBackend;
use qkart_storefront::SearchDebouncer;

const DEBOUNCE: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_typing_sends_one_query() {
    let backend = MockBackend::start().await;
    let mut debouncer = SearchDebouncer::new(backend.client(), DEBOUNCE);
    let mut results = debouncer.subscribe();

    for text in ["l", "le", "lea", "leat", "leather"] {
        debouncer.on_input(text);
    }

    tokio::time::timeout(Duration::from_secs(5), results.changed())
        .await
        .unwrap()
        .unwrap();

    let latest = results.borrow_and_update().clone();
    assert_eq!(latest.seq, 5);
    assert_eq!(latest.query, "leather");
    assert_eq!(latest.products.len(), 2);
    assert_eq!(backend.search_queries(), vec!["leather"]);
}

#[tokio::test]
async fn test_no_match_publishes_empty_results() {
    let backend = MockBackend::start().await;
    let mut debouncer = SearchDebouncer::new(backend.client(), DEBOUNCE);
    let mut results = debouncer.subscribe();

    debouncer.on_input("xyz");
    tokio::time::timeout(Duration::from_secs(5), results.changed())
        .await
        .unwrap()
        .unwrap();

    let latest = results.borrow_and_update().clone();
    assert_eq!(latest.query, "xyz");
    assert!(latest.products.is_empty());
    assert!(latest.error.is_none());
}

#[tokio::test]
async fn test_backend_failure_is_published() {
    let backend = MockBackend::start().await;
    backend.fail_with(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let mut debouncer = SearchDebouncer::new(backend.client(), DEBOUNCE);
    let mut results = debouncer.subscribe();

    let seq = debouncer.on_input("phone");
    tokio::time::timeout(Duration::from_secs(5), results.changed())
        .await
        .unwrap()
        .unwrap();

    let latest = results.borrow_and_update().clone();
    assert_eq!(latest.seq, seq);
    assert!(latest.products.is_empty());
    assert_eq!(
        latest.error.as_deref(),
        Some("Error fetching products. Please try again later.")
    );
}
