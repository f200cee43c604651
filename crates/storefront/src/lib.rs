//! QKart Storefront client library.
//!
//! Talks to the QKart REST backend and implements the client-side logic
//! of the storefront: catalog fetching, cart reconciliation and updates,
//! login/registration and debounced search.
//!
//! # Modules
//!
//! - [`client`] - HTTP client for the backend's REST API
//! - [`services`] - Auth and cart operations built on the client
//! - [`search`] - Debounced, sequence-checked catalog search
//! - [`models`] - Session context
//! - [`config`] - Environment-based configuration
//! - [`error`] - Error type and user-facing messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod services;

pub use client::StorefrontClient;
pub use config::StorefrontConfig;
pub use error::{Operation, StorefrontError};
pub use models::Session;
pub use search::{SearchDebouncer, SearchResults, SearchSource};
pub use services::{AuthService, CartService, SetQuantityOptions};
