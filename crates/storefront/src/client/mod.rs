//! QKart REST API client.
//!
//! Wraps `reqwest` with the backend's conventions: JSON bodies, bearer
//! tokens for cart endpoints, and `{success: false, message}` error bodies.
//! The unfiltered catalog is cached using `moka` (see
//! [`StorefrontConfig::catalog_cache_ttl`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use qkart_storefront::client::StorefrontClient;
//!
//! let client = StorefrontClient::new(config)?;
//! let catalog = client.fetch_all_products().await?;
//! let phones = client.fetch_filtered_products("phone").await?;
//! ```

pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use qkart_core::{CartEntry, Product, ProductId};

use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError};
use crate::models::Session;

use types::{CartUpdateRequest, Credentials, ErrorBody, LoginResponse, RegisterResponse};

const CATALOG_CACHE_KEY: &str = "catalog";

/// Longest body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the QKart backend.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the
/// catalog cache.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    config: StorefrontConfig,
    catalog_cache: Option<Cache<&'static str, Arc<[Product]>>>,
}

impl StorefrontClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Http` if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let catalog_cache = (!config.catalog_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(config.catalog_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                config,
                catalog_cache,
            }),
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Send a request and decode a JSON success body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let err = error_from_response(status, &body);
            if status.is_server_error() {
                tracing::error!(
                    status = %status,
                    body = %excerpt(&body),
                    "QKart backend returned server error"
                );
            } else {
                debug!(status = %status, error = %err, "QKart backend rejected request");
            }
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse QKart backend response"
            );
            StorefrontError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch the full catalog (`GET /products`).
    ///
    /// Served from cache while the cached copy is younger than the
    /// configured TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    #[instrument(skip(self))]
    pub async fn fetch_all_products(&self) -> Result<Vec<Product>> {
        if let Some(cache) = &self.inner.catalog_cache
            && let Some(products) = cache.get(CATALOG_CACHE_KEY).await
        {
            debug!(count = products.len(), "Cache hit for catalog");
            return Ok(products.to_vec());
        }

        let request = self
            .inner
            .client
            .get(self.inner.config.endpoint("products"));
        let products: Vec<Product> = self.send(request).await?;
        debug!(count = products.len(), "Fetched catalog");

        if let Some(cache) = &self.inner.catalog_cache {
            cache
                .insert(CATALOG_CACHE_KEY, Arc::from(products.as_slice()))
                .await;
        }

        Ok(products)
    }

    /// Fetch products matching `query` (`GET /products/search?value=`).
    ///
    /// A 404 means "no matches" and yields an empty list. A blank query
    /// returns the full catalog. Search results are never cached.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "no matches".
    #[instrument(skip(self))]
    pub async fn fetch_filtered_products(&self, query: &str) -> Result<Vec<Product>> {
        if query.trim().is_empty() {
            return self.fetch_all_products().await;
        }

        let request = self
            .inner
            .client
            .get(self.inner.config.endpoint("products/search"))
            .query(&[("value", query)]);

        match self.send::<Vec<Product>>(request).await {
            Ok(products) => Ok(products),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                debug!("No products match search");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Fetch the server cart (`GET /cart`).
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Rejected` when the backend refuses the token
    /// or request, or another error if the request fails.
    #[instrument(skip(self, session), fields(username = %session.username()))]
    pub async fn get_cart(&self, session: &Session) -> Result<Vec<CartEntry>> {
        let request = self
            .inner
            .client
            .get(self.inner.config.endpoint("cart"))
            .header(reqwest::header::AUTHORIZATION, session.bearer());

        self.send(request).await
    }

    /// Set the quantity of a product in the server cart (`POST /cart`).
    ///
    /// Returns the complete updated server cart. Quantity zero is passed
    /// through unchanged; the backend decides what it means.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Rejected` for unknown products or refused
    /// tokens, or another error if the request fails.
    #[instrument(skip(self, session), fields(username = %session.username()))]
    pub async fn update_cart(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartEntry>> {
        let request = self
            .inner
            .client
            .post(self.inner.config.endpoint("cart"))
            .header(reqwest::header::AUTHORIZATION, session.bearer())
            .json(&CartUpdateRequest {
                product_id,
                qty: quantity,
            });

        self.send(request).await
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Exchange credentials for a session (`POST /auth/login`).
    ///
    /// Performs no input validation; see
    /// [`AuthService`](crate::services::AuthService) for that.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Rejected` with the backend's message for
    /// bad credentials, or another error if the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let request = self
            .inner
            .client
            .post(self.inner.config.endpoint("auth/login"))
            .json(&Credentials { username, password });

        let response: LoginResponse = self.send(request).await?;

        Ok(Session::new(
            response.token.into(),
            response.username,
            response.balance,
        ))
    }

    /// Create an account (`POST /auth/register`).
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Rejected` with the backend's message (e.g.
    /// "Username is already taken"), or another error if the request fails.
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        let request = self
            .inner
            .client
            .post(self.inner.config.endpoint("auth/register"))
            .json(&Credentials { username, password });

        let _: RegisterResponse = self.send(request).await?;
        Ok(())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop the cached catalog so the next fetch goes to the backend.
    pub async fn invalidate_catalog(&self) {
        if let Some(cache) = &self.inner.catalog_cache {
            cache.invalidate(CATALOG_CACHE_KEY).await;
        }
    }
}

impl StorefrontError {
    /// HTTP status associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } | Self::Status(status) => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Map a non-success response to an error.
///
/// Client errors carrying a `message` become `Rejected` so the message can
/// be shown verbatim; everything else is a bare `Status`.
fn error_from_response(status: StatusCode, body: &str) -> StorefrontError {
    if status.is_client_error() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        if let Some(message) = message {
            return StorefrontError::Rejected { status, message };
        }
    }

    StorefrontError::Status(status)
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
