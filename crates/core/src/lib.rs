//! QKart Core - Shared domain types.
//!
//! This crate provides the types shared by every QKart component:
//! - `storefront` - REST client for the QKart backend
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, cart entries and type-safe IDs
//! - [`cart`] - Cart reconciliation and totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{cart_total, is_item_in_cart, reconcile, total_items};
pub use types::*;
