//! Cart reconciliation.
//!
//! The backend only knows `(productId, qty)` pairs. Everything the UI shows
//! about a cart line comes from joining those pairs with the catalog, and
//! that join is recomputed from scratch after every catalog fetch, cart
//! fetch and cart mutation.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::types::{CartEntry, CartLineItem, Product, ProductId};

/// Join a server cart with the catalog.
///
/// Each entry is matched with the first product carrying the same id.
/// Entries with no matching product are dropped without error: a cart that
/// still references a deleted product simply stops showing that line.
/// The output keeps the order of `server_cart`.
///
/// # Example
///
/// ```rust
/// # use qkart_core::{reconcile, CartEntry};
/// // Nothing in the catalog, so nothing can be shown.
/// assert!(reconcile(&[CartEntry::new("X", 1)], &[]).is_empty());
/// ```
#[must_use]
pub fn reconcile(server_cart: &[CartEntry], catalog: &[Product]) -> Vec<CartLineItem> {
    if server_cart.is_empty() || catalog.is_empty() {
        return Vec::new();
    }

    let mut by_id: HashMap<&ProductId, &Product> = HashMap::with_capacity(catalog.len());
    for product in catalog {
        by_id.entry(&product.id).or_insert(product);
    }

    server_cart
        .iter()
        .filter_map(|entry| {
            by_id
                .get(&entry.product_id)
                .map(|product| CartLineItem::from_entry(entry, product))
        })
        .collect()
}

/// Total value of the cart (sum of cost times quantity).
///
/// Returns `None` if the total does not fit in a `Decimal`.
#[must_use]
pub fn cart_total(items: &[CartLineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.line_total()?))
}

/// Total number of units in the cart.
#[must_use]
pub fn total_items(items: &[CartLineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Whether a line item for `product_id` is present.
#[must_use]
pub fn is_item_in_cart(items: &[CartLineItem], product_id: &ProductId) -> bool {
    items.iter().any(|item| &item.product_id == product_id)
}
