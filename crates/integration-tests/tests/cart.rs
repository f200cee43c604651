//! Cart fetching and mutation against the mock backend.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use rust_decimal::Decimal;
use secrecy::SecretString;

use qkart_core::{CartEntry, Product, ProductId, cart_total, total_items};
use qkart_integration_tests::{MockBackend, TEST_PASSWORD, TEST_USERNAME};
use qkart_storefront::{
    AuthService, CartService, Operation, Session, SetQuantityOptions, StorefrontClient,
    StorefrontError,
};

const SHOES: &str = "BW0jAAeDJmlZCF8i";
const RACQUET: &str = "KCRwjF7lN97HnEaY";

async fn logged_in(backend: &MockBackend) -> (StorefrontClient, Session, Vec<Product>) {
    let client = backend.client();
    let session = AuthService::new(&client)
        .login(TEST_USERNAME, TEST_PASSWORD)
        .await
        .unwrap();
    let catalog = client.fetch_all_products().await.unwrap();
    (client, session, catalog)
}

#[tokio::test]
async fn test_fetch_cart_enriches_entries() {
    let backend = MockBackend::start().await;
    backend.set_cart(
        TEST_USERNAME,
        vec![CartEntry::new(RACQUET, 2), CartEntry::new(SHOES, 1)],
    );
    let (client, session, catalog) = logged_in(&backend).await;

    let items = CartService::new(&client)
        .fetch_cart(Some(&session), &catalog)
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "YONEX Smash Badminton Racquet");
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[1].product_id, ProductId::new(SHOES));
    assert_eq!(cart_total(&items), Some(Decimal::new(250, 0)));
    assert_eq!(total_items(&items), 3);
}

#[tokio::test]
async fn test_entries_missing_from_catalog_are_dropped() {
    let backend = MockBackend::start().await;
    backend.set_cart(
        TEST_USERNAME,
        vec![CartEntry::new("discontinued", 4), CartEntry::new(SHOES, 1)],
    );
    let (client, session, catalog) = logged_in(&backend).await;

    let items = CartService::new(&client)
        .fetch_cart(Some(&session), &catalog)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, ProductId::new(SHOES));
}

#[tokio::test]
async fn test_add_to_cart_then_update_quantity() {
    let backend = MockBackend::start().await;
    let (client, session, catalog) = logged_in(&backend).await;
    let cart = CartService::new(&client);

    let items = cart
        .add_to_cart(Some(&session), &[], &catalog, &ProductId::new(SHOES))
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 1);

    let items = cart
        .set_quantity(
            Some(&session),
            &items,
            &catalog,
            &ProductId::new(SHOES),
            3,
            SetQuantityOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(items[0].quantity, 3);
    assert_eq!(cart_total(&items), Some(Decimal::new(150, 0)));
    assert_eq!(backend.cart(TEST_USERNAME), vec![CartEntry::new(SHOES, 3)]);
}

#[tokio::test]
async fn test_zero_quantity_is_sent_to_backend() {
    let backend = MockBackend::start().await;
    backend.set_cart(TEST_USERNAME, vec![CartEntry::new(SHOES, 2)]);
    let (client, session, catalog) = logged_in(&backend).await;
    let cart = CartService::new(&client);
    let items = cart.fetch_cart(Some(&session), &catalog).await.unwrap();

    let items = cart
        .set_quantity(
            Some(&session),
            &items,
            &catalog,
            &ProductId::new(SHOES),
            0,
            SetQuantityOptions::default(),
        )
        .await
        .unwrap();

    assert!(items.is_empty());
    assert!(backend.cart(TEST_USERNAME).is_empty());
}

#[tokio::test]
async fn test_unauthenticated_update_makes_no_request() {
    let backend = MockBackend::start().await;
    let client = backend.client();
    let catalog = client.fetch_all_products().await.unwrap();
    let before = backend.request_count();

    let err = CartService::new(&client)
        .add_to_cart(None, &[], &catalog, &ProductId::new(SHOES))
        .await
        .unwrap_err();

    assert!(matches!(err, StorefrontError::AuthenticationRequired));
    assert!(err.is_warning());
    assert_eq!(
        err.user_message(Operation::UpdateCart),
        "Login to add an item to the Cart"
    );
    assert_eq!(backend.request_count(), before);
}

#[tokio::test]
async fn test_duplicate_add_makes_no_request() {
    let backend = MockBackend::start().await;
    backend.set_cart(TEST_USERNAME, vec![CartEntry::new(SHOES, 1)]);
    let (client, session, catalog) = logged_in(&backend).await;
    let cart = CartService::new(&client);
    let items = cart.fetch_cart(Some(&session), &catalog).await.unwrap();
    let before = backend.request_count();

    let err = cart
        .add_to_cart(Some(&session), &items, &catalog, &ProductId::new(SHOES))
        .await
        .unwrap_err();

    assert!(matches!(err, StorefrontError::DuplicateItem));
    assert_eq!(backend.request_count(), before);
    assert_eq!(backend.cart(TEST_USERNAME), vec![CartEntry::new(SHOES, 1)]);
}

#[tokio::test]
async fn test_unknown_product_message_is_shown_verbatim() {
    let backend = MockBackend::start().await;
    let (client, session, catalog) = logged_in(&backend).await;

    let err = CartService::new(&client)
        .add_to_cart(Some(&session), &[], &catalog, &ProductId::new("nope"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StorefrontError::Rejected {
            status: StatusCode::NOT_FOUND,
            ..
        }
    ));
    assert_eq!(
        err.user_message(Operation::UpdateCart),
        "Product doesn't exist"
    );
}

#[tokio::test]
async fn test_rejected_token_message_is_shown_verbatim() {
    let backend = MockBackend::start().await;
    let client = backend.client();
    let catalog = client.fetch_all_products().await.unwrap();
    let stale = Session::new(
        SecretString::from("expired"),
        TEST_USERNAME.to_string(),
        Decimal::ZERO,
    );

    let err = CartService::new(&client)
        .fetch_cart(Some(&stale), &catalog)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(
        err.user_message(Operation::FetchCart),
        "Protected route, Oauth2 Bearer token not found"
    );
}

#[tokio::test]
async fn test_failed_update_leaves_backend_cart_unchanged() {
    let backend = MockBackend::start().await;
    backend.set_cart(TEST_USERNAME, vec![CartEntry::new(SHOES, 1)]);
    let (client, session, catalog) = logged_in(&backend).await;
    let cart = CartService::new(&client);
    let items = cart.fetch_cart(Some(&session), &catalog).await.unwrap();

    backend.fail_with(StatusCode::INTERNAL_SERVER_ERROR);
    let err = cart
        .set_quantity(
            Some(&session),
            &items,
            &catalog,
            &ProductId::new(SHOES),
            5,
            SetQuantityOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(Operation::UpdateCart),
        "Error adding item to Cart. Please try again later."
    );
    assert_eq!(items[0].quantity, 1);
    assert_eq!(backend.cart(TEST_USERNAME), vec![CartEntry::new(SHOES, 1)]);
}
