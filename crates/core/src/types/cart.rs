//! Cart types.
//!
//! The backend stores a cart as bare `(productId, qty)` pairs
//! ([`CartEntry`]). The client joins those with the catalog to produce
//! [`CartLineItem`]s for display; see [`crate::cart::reconcile`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Cost, Product, ProductId, Rating};

/// A cart entry as held by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// ID of the product in the cart.
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    /// How many units are in the cart.
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartEntry {
    /// Create a new cart entry.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A cart entry enriched with the display attributes of its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// ID of the product in the cart.
    pub product_id: ProductId,
    /// Quantity from the server cart.
    pub quantity: u32,
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Unit cost.
    pub cost: Cost,
    /// Product rating.
    pub rating: Rating,
    /// Product image URL.
    pub image_url: String,
}

impl CartLineItem {
    /// Join a cart entry with its matching product.
    #[must_use]
    pub fn from_entry(entry: &CartEntry, product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            quantity: entry.quantity,
            name: product.name.clone(),
            category: product.category.clone(),
            cost: product.cost,
            rating: product.rating,
            image_url: product.image_url.clone(),
        }
    }

    /// Cost of this line (unit cost times quantity), or `None` if the
    /// product overflows a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.cost.checked_times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_entry_wire_names() {
        let entry: CartEntry =
            serde_json::from_str(r#"{"productId":"KCRwjF7lN97HnEaY","qty":3}"#).unwrap();
        assert_eq!(entry, CartEntry::new("KCRwjF7lN97HnEaY", 3));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["productId"], "KCRwjF7lN97HnEaY");
        assert_eq!(json["qty"], 3);
    }

    #[test]
    fn test_line_total() {
        let product = Product {
            id: ProductId::new("1"),
            name: "Basketball".to_string(),
            category: "Sports".to_string(),
            cost: Cost::new(Decimal::new(1550, 2)).unwrap(),
            rating: Rating::new(5).unwrap(),
            image_url: String::new(),
        };
        let item = CartLineItem::from_entry(&CartEntry::new("1", 3), &product);
        assert_eq!(item.line_total(), Some(Decimal::new(4650, 2)));
    }

    #[test]
    fn test_line_total_overflow_is_none() {
        let product: Product = serde_json::from_str(
            r#"{"_id":"1","name":"Yacht","category":"Luxury","cost":1e25,"rating":5,"image":""}"#,
        )
        .unwrap();
        let item = CartLineItem::from_entry(&CartEntry::new("1", 10_000), &product);
        assert_eq!(item.line_total(), None);
    }
}
