//! Integration tests for the QKart storefront client.
//!
//! Tests run the real [`StorefrontClient`] against [`MockBackend`], an
//! in-process `axum` server that speaks the QKart REST API on an
//! ephemeral port. No external services are needed.
//!
//! ```bash
//! cargo test -p qkart-integration-tests
//! ```
//!
//! # Mock behaviour
//!
//! - `GET /products` returns [`catalog_fixture`]
//! - `GET /products/search?value=` matches name or category,
//!   case-insensitively, and answers 404 with `[]` when nothing matches
//! - `POST /auth/register` and `POST /auth/login` keep users in memory
//! - `GET /cart` and `POST /cart` require `Authorization: Bearer <token>`;
//!   `qty: 0` removes the line
//!
//! Every request is counted, and [`MockBackend::fail_with`] turns every
//! later request into a server error.

#![allow(clippy::missing_panics_doc, clippy::must_use_candidate)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use qkart_core::CartEntry;
use qkart_storefront::{StorefrontClient, StorefrontConfig};

/// User registered on every fresh [`MockBackend`].
pub const TEST_USERNAME: &str = "crio.do";
/// Password of [`TEST_USERNAME`].
pub const TEST_PASSWORD: &str = "learnwithcrio";
/// Wallet balance reported at login.
pub const STARTING_BALANCE: u32 = 5000;

const TOKEN_PREFIX: &str = "mock-token-";
const SERVER_ERROR_MESSAGE: &str =
    "Something went wrong. Check the backend console for more details";

/// The products served by the mock, as the backend sends them.
pub fn catalog_fixture() -> Vec<Value> {
    vec![
        json!({
            "_id": "BW0jAAeDJmlZCF8i",
            "name": "UNIFACTOR Mens Running Shoes",
            "category": "Fashion",
            "cost": 50,
            "rating": 5,
            "image": "https://crio-directus-assets.s3.ap-south-1.amazonaws.com/42d4d057-8704-4174-8d74-e5e9052677c6.png"
        }),
        json!({
            "_id": "KCRwjF7lN97HnEaY",
            "name": "YONEX Smash Badminton Racquet",
            "category": "Sports",
            "cost": 100,
            "rating": 5,
            "image": "https://crio-directus-assets.s3.ap-south-1.amazonaws.com/64b930f7-3c82-4a29-a433-dbc6f1493578.png"
        }),
        json!({
            "_id": "upLK9JbQ4rMhTwt4",
            "name": "Tan Leatherette Weekender Duffle",
            "category": "Fashion",
            "cost": 150,
            "rating": 4,
            "image": "https://crio-directus-assets.s3.ap-south-1.amazonaws.com/ff071a1c-1099-48f9-9b03-f858ccc53832.png"
        }),
        json!({
            "_id": "a4sLtEcMpzabRyfx",
            "name": "The Minimalist Slim Leather Watch",
            "category": "Electronics",
            "cost": 60,
            "rating": 5,
            "image": "https://crio-directus-assets.s3.ap-south-1.amazonaws.com/5b478a4a-bf81-467c-964c-1881887799b7.png"
        }),
    ]
}

// =============================================================================
// MockBackend
// =============================================================================

#[derive(Default)]
struct MockState {
    products: Vec<Value>,
    users: Mutex<HashMap<String, String>>,
    carts: Mutex<HashMap<String, Vec<CartEntry>>>,
    searches: Mutex<Vec<String>>,
    failure: Mutex<Option<StatusCode>>,
    requests: AtomicUsize,
}

/// In-process QKart backend.
///
/// The server task is aborted on drop.
pub struct MockBackend {
    api_url: String,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend on an ephemeral local port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            products: catalog_fixture(),
            ..MockState::default()
        });
        lock(&state.users).insert(TEST_USERNAME.to_string(), TEST_PASSWORD.to_string());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let app = router(Arc::clone(&state));
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock backend failed");
        });

        Self {
            api_url: format!("http://{addr}/api/v1"),
            state,
            server,
        }
    }

    /// Base URL including the `/api/v1` prefix.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Client configuration pointing at this backend.
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig::new(&self.api_url).expect("Mock backend URL is valid")
    }

    /// Client for this backend with default settings.
    pub fn client(&self) -> StorefrontClient {
        StorefrontClient::new(self.config()).expect("Failed to build client")
    }

    /// Bearer token the backend issues to `username`.
    pub fn token_for(username: &str) -> String {
        format!("{TOKEN_PREFIX}{username}")
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Search queries received so far, in arrival order.
    pub fn search_queries(&self) -> Vec<String> {
        lock(&self.state.searches).clone()
    }

    /// Replace the stored cart of `username`, bypassing validation.
    pub fn set_cart(&self, username: &str, entries: Vec<CartEntry>) {
        lock(&self.state.carts).insert(username.to_string(), entries);
    }

    /// Stored cart of `username`.
    pub fn cart(&self, username: &str) -> Vec<CartEntry> {
        lock(&self.state.carts)
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    /// Answer every later request with `status` and a generic error body.
    pub fn fail_with(&self, status: StatusCode) {
        *lock(&self.state.failure) = Some(status);
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("Mock backend state poisoned")
}

fn router(state: Arc<MockState>) -> Router {
    let api = Router::new()
        .route("/products", get(list_products))
        .route("/products/search", get(search_products))
        .route("/cart", get(get_cart).post(update_cart))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            record_request,
        ))
        .with_state(state)
}

async fn record_request(
    State(state): State<Arc<MockState>>,
    request: Request,
    next: Next,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let failure = *lock(&state.failure);
    if let Some(status) = failure {
        return rejected(status, SERVER_ERROR_MESSAGE);
    }

    next.run(request).await
}

fn rejected(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<Arc<MockState>>) -> Json<Vec<Value>> {
    Json(state.products.clone())
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    value: String,
}

async fn search_products(
    State(state): State<Arc<MockState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    lock(&state.searches).push(params.value.clone());

    let needle = params.value.to_lowercase();
    let matches: Vec<Value> = state
        .products
        .iter()
        .filter(|product| {
            ["name", "category"].iter().any(|field| {
                product[*field]
                    .as_str()
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        return (StatusCode::NOT_FOUND, Json(json!([]))).into_response();
    }
    Json(matches).into_response()
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn register(
    State(state): State<Arc<MockState>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    let mut users = lock(&state.users);
    if users.contains_key(&credentials.username) {
        return rejected(StatusCode::BAD_REQUEST, "Username is already taken");
    }
    users.insert(credentials.username, credentials.password);

    (StatusCode::CREATED, Json(json!({ "success": true }))).into_response()
}

async fn login(
    State(state): State<Arc<MockState>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    match lock(&state.users).get(&credentials.username) {
        None => return rejected(StatusCode::BAD_REQUEST, "Username does not exist"),
        Some(password) if *password != credentials.password => {
            return rejected(StatusCode::BAD_REQUEST, "Password is incorrect");
        }
        Some(_) => {}
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": MockBackend::token_for(&credentials.username),
            "username": credentials.username,
            "balance": STARTING_BALANCE,
        })),
    )
        .into_response()
}

/// Username behind the request's bearer token, if it names a known user.
fn authenticated_user(state: &MockState, headers: &HeaderMap) -> Option<String> {
    let username = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .strip_prefix(TOKEN_PREFIX)?;

    lock(&state.users)
        .contains_key(username)
        .then(|| username.to_string())
}

fn unauthorized() -> Response {
    rejected(
        StatusCode::UNAUTHORIZED,
        "Protected route, Oauth2 Bearer token not found",
    )
}

async fn get_cart(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    let Some(username) = authenticated_user(&state, &headers) else {
        return unauthorized();
    };

    let cart = lock(&state.carts)
        .get(&username)
        .cloned()
        .unwrap_or_default();
    Json(cart).into_response()
}

#[derive(Deserialize)]
struct CartUpdate {
    #[serde(rename = "productId")]
    product_id: String,
    qty: u32,
}

async fn update_cart(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(update): Json<CartUpdate>,
) -> Response {
    let Some(username) = authenticated_user(&state, &headers) else {
        return unauthorized();
    };

    let known = state
        .products
        .iter()
        .any(|product| product["_id"].as_str() == Some(update.product_id.as_str()));
    if !known {
        return rejected(StatusCode::NOT_FOUND, "Product doesn't exist");
    }

    let mut carts = lock(&state.carts);
    let cart = carts.entry(username).or_default();
    match cart
        .iter_mut()
        .find(|entry| entry.product_id.as_str() == update.product_id)
    {
        Some(entry) => entry.quantity = update.qty,
        None => cart.push(CartEntry::new(update.product_id, update.qty)),
    }
    cart.retain(|entry| entry.quantity > 0);

    Json(cart.clone()).into_response()
}
