//! Cart commands.
//!
//! Each command checks for a saved session, then loads the catalog and the
//! server cart, the same sequence a page load performs, so that quantity
//! updates are checked against current cart contents. Nothing is fetched
//! while logged out.

use tracing::instrument;

use qkart_core::{CartLineItem, Product, ProductId};
use qkart_storefront::{CartService, Operation, Session, SetQuantityOptions, StorefrontError};

use super::{CommandError, Context};
use crate::output;

/// Catalog, session and reconciled cart as of now.
struct Snapshot {
    catalog: Vec<Product>,
    session: Session,
    items: Vec<CartLineItem>,
}

/// Load the snapshot `operation` works on; fails before any request
/// when logged out.
async fn snapshot(ctx: &Context, operation: Operation) -> Result<Snapshot, CommandError> {
    let Some(session) = ctx.sessions.load().await? else {
        let logged_out = CommandError::storefront(operation);
        return Err(logged_out(StorefrontError::AuthenticationRequired));
    };

    let catalog = ctx
        .client
        .fetch_all_products()
        .await
        .map_err(CommandError::storefront(Operation::FetchProducts))?;
    let items = CartService::new(&ctx.client)
        .fetch_cart(Some(&session), &catalog)
        .await
        .map_err(CommandError::storefront(Operation::FetchCart))?;

    Ok(Snapshot {
        catalog,
        session,
        items,
    })
}

/// Show the cart with totals.
///
/// # Errors
///
/// Returns an error if not logged in or the cart cannot be fetched.
#[instrument(skip(ctx))]
pub async fn show(ctx: &Context) -> Result<(), CommandError> {
    let snapshot = snapshot(ctx, Operation::FetchCart).await?;
    output::cart(&snapshot.items);
    Ok(())
}

/// Add one unit of a product not yet in the cart.
///
/// # Errors
///
/// Returns an error if not logged in, the product is already in the cart,
/// or the backend rejects the update.
#[instrument(skip(ctx))]
pub async fn add(ctx: &Context, product_id: &str) -> Result<(), CommandError> {
    let snapshot = snapshot(ctx, Operation::UpdateCart).await?;
    let items = CartService::new(&ctx.client)
        .add_to_cart(
            Some(&snapshot.session),
            &snapshot.items,
            &snapshot.catalog,
            &ProductId::new(product_id),
        )
        .await
        .map_err(CommandError::storefront(Operation::UpdateCart))?;

    output::cart(&items);
    Ok(())
}

/// Set the quantity of a product; 0 asks the backend to remove it.
///
/// # Errors
///
/// Returns an error if not logged in or the backend rejects the update.
#[instrument(skip(ctx))]
pub async fn set(ctx: &Context, product_id: &str, quantity: u32) -> Result<(), CommandError> {
    let snapshot = snapshot(ctx, Operation::UpdateCart).await?;
    let items = CartService::new(&ctx.client)
        .set_quantity(
            Some(&snapshot.session),
            &snapshot.items,
            &snapshot.catalog,
            &ProductId::new(product_id),
            quantity,
            SetQuantityOptions::default(),
        )
        .await
        .map_err(CommandError::storefront(Operation::UpdateCart))?;

    output::cart(&items);
    Ok(())
}
