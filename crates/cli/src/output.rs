//! Terminal output.
//!
//! All user-facing text goes through here; diagnostics go through
//! `tracing` to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use qkart_core::{CartLineItem, Product, cart_total, total_items};
use qkart_storefront::{SearchResults, Session};

/// Print a product listing.
pub fn products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }

    for product in products {
        println!(
            "{:<18} {:<40} {:<12} ${:<8} {}",
            product.id,
            product.name,
            product.category,
            product.cost,
            product.rating
        );
    }
}

/// Print a debounced search outcome.
pub fn search_results(results: &SearchResults) {
    println!("-- results for \"{}\" --", results.query);
    match &results.error {
        Some(message) => failure(message, false),
        None => products(&results.products),
    }
}

/// Print the enriched cart with totals.
pub fn cart(items: &[CartLineItem]) {
    if items.is_empty() {
        println!("Cart is empty. Add more items to the cart to checkout.");
        return;
    }

    for item in items {
        println!(
            "{:<18} {:<40} x{:<4} ${}",
            item.product_id, item.name, item.quantity, item.cost
        );
    }
    println!("Items: {}", total_items(items));
    match cart_total(items) {
        Some(total) => println!("Order Total: ${total}"),
        None => {
            tracing::warn!(lines = items.len(), "Cart total overflowed");
            println!("Order Total: too large to display");
        }
    }
}

/// Print the logged-in user.
pub fn session(session: Option<&Session>) {
    match session {
        Some(session) => println!(
            "Logged in as {} (wallet balance ${})",
            session.username(),
            session.balance()
        ),
        None => println!("Not logged in"),
    }
}

/// Print a success notice.
pub fn notice(message: &str) {
    println!("{message}");
}

/// Print a failure; pre-flight rejections are shown as warnings.
pub fn failure(message: &str, warning: bool) {
    if warning {
        eprintln!("warning: {message}");
    } else {
        eprintln!("error: {message}");
    }
}
