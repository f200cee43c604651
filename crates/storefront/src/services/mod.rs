//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Login and registration with client-side input validation
//! - `cart` - Cart fetch and quantity updates, reconciled against the catalog
//!
//! Services borrow a [`StorefrontClient`](crate::client::StorefrontClient)
//! and are cheap to construct per operation.

pub mod auth;
pub mod cart;

pub use auth::{AuthService, validate_login, validate_registration};
pub use cart::{CartService, SetQuantityOptions};
