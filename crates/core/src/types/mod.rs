//! Core types for QKart.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::{CartEntry, CartLineItem};
pub use id::ProductId;
pub use product::{Cost, CostError, Product, Rating, RatingError};
