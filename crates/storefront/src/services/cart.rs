//! Cart service.
//!
//! Cart state is never patched locally. Every fetch and every quantity
//! update returns the backend's full server cart, which is reconciled
//! against the caller's catalog to produce a fresh list of line items.
//! On failure the caller's previous items are untouched, since they are
//! only ever borrowed.

use tracing::{debug, info, instrument};

use qkart_core::{CartLineItem, Product, ProductId, reconcile};

use crate::client::StorefrontClient;
use crate::error::{Result, StorefrontError};
use crate::models::Session;

/// Options for [`CartService::set_quantity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetQuantityOptions {
    /// Reject the update if the product already has a cart line with a
    /// non-zero quantity.
    ///
    /// Set by "Add to Cart"; left off by the +/- quantity controls.
    pub prevent_duplicate: bool,
}

/// Cart service.
pub struct CartService<'a> {
    client: &'a StorefrontClient,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(client: &'a StorefrontClient) -> Self {
        Self { client }
    }

    /// Fetch the user's cart and enrich it with catalog data.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::AuthenticationRequired` without a session,
    /// `StorefrontError::Rejected` if the backend refuses the request, or a
    /// transport error.
    #[instrument(skip_all)]
    pub async fn fetch_cart(
        &self,
        session: Option<&Session>,
        catalog: &[Product],
    ) -> Result<Vec<CartLineItem>> {
        let session = session.ok_or(StorefrontError::AuthenticationRequired)?;

        let server_cart = self.client.get_cart(session).await?;
        let items = reconcile(&server_cart, catalog);
        debug!(
            entries = server_cart.len(),
            items = items.len(),
            "Reconciled server cart"
        );

        Ok(items)
    }

    /// Set how many units of `product_id` are in the cart.
    ///
    /// A quantity of zero is sent as-is; removal is up to the backend.
    ///
    /// # Errors
    ///
    /// Returns, without contacting the backend:
    /// - `StorefrontError::AuthenticationRequired` if `session` is `None`
    /// - `StorefrontError::DuplicateItem` if `options.prevent_duplicate` is
    ///   set and `current_items` already holds the product
    ///
    /// Otherwise returns `StorefrontError::Rejected` with the backend's
    /// message (e.g. an unknown product) or a transport error.
    #[instrument(skip(self, session, current_items, catalog), fields(product_id = %product_id))]
    pub async fn set_quantity(
        &self,
        session: Option<&Session>,
        current_items: &[CartLineItem],
        catalog: &[Product],
        product_id: &ProductId,
        quantity: u32,
        options: SetQuantityOptions,
    ) -> Result<Vec<CartLineItem>> {
        let session = session.ok_or(StorefrontError::AuthenticationRequired)?;

        if options.prevent_duplicate && has_nonzero_line(current_items, product_id) {
            debug!("Product already in cart");
            return Err(StorefrontError::DuplicateItem);
        }

        let server_cart = self
            .client
            .update_cart(session, product_id, quantity)
            .await?;
        let items = reconcile(&server_cart, catalog);
        info!(quantity, items = items.len(), "Cart updated");

        Ok(items)
    }

    /// "Add to Cart": put one unit of `product_id` in the cart, refusing
    /// products that are already there.
    ///
    /// # Errors
    ///
    /// See [`CartService::set_quantity`].
    pub async fn add_to_cart(
        &self,
        session: Option<&Session>,
        current_items: &[CartLineItem],
        catalog: &[Product],
        product_id: &ProductId,
    ) -> Result<Vec<CartLineItem>> {
        self.set_quantity(
            session,
            current_items,
            catalog,
            product_id,
            1,
            SetQuantityOptions {
                prevent_duplicate: true,
            },
        )
        .await
    }
}

fn has_nonzero_line(items: &[CartLineItem], product_id: &ProductId) -> bool {
    items
        .iter()
        .any(|item| &item.product_id == product_id && item.quantity > 0)
}
