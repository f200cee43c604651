//! Product listing and one-shot search.

use tracing::instrument;

use qkart_storefront::Operation;

use super::{CommandError, Context};
use crate::output;

/// List the catalog, or the products matching `search`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
#[instrument(skip(ctx))]
pub async fn list(ctx: &Context, search: Option<&str>) -> Result<(), CommandError> {
    let products = match search {
        Some(query) => ctx
            .client
            .fetch_filtered_products(query)
            .await
            .map_err(CommandError::storefront(Operation::SearchProducts))?,
        None => ctx
            .client
            .fetch_all_products()
            .await
            .map_err(CommandError::storefront(Operation::FetchProducts))?,
    };

    output::products(&products);
    Ok(())
}
