//! # Product Commands
//!
//! Product admin: list, search, create, edit, hide, delete.
//!
//! ## Admin Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Search: [ mal        ]                              [ Active only ]    │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │  Malta         Bebidas    $2.50    stock 4   min 10   ● on   [Edit]     │
//! │  Mofongo       Platos     $9.00    recipe: Mofongo    ● on   [Edit]     │
//! │  Old special   Platos     $7.00    stock 0            ○ off  [Delete]   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hiding a product (`set_product_active`) takes it off the menu but keeps
//! it here; deleting removes the row. Past orders keep their own copy of
//! each line, so neither touches sales history.

use serde::Deserialize;
use tracing::{debug, info};

use caribe_core::{Product, ProductInput, ProductListing};

use super::{IdArgs, ToggleArgs};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListProductsArgs {
    /// Case-insensitive name filter.
    pub query: Option<String>,
    /// Hide products switched off from the menu.
    pub active_only: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductArgs {
    pub id: String,
    pub product: ProductInput,
}

/// Products with category and recipe names.
///
/// ## Behavior
/// - `query`: case-insensitive substring match on the name
/// - `activeOnly`: hides products switched off from the menu
/// - Without a query, rows come ordered by category then name
pub async fn list_products(
    state: &AppState,
    args: ListProductsArgs,
) -> Result<Vec<ProductListing>, ApiError> {
    debug!(query = ?args.query, active_only = args.active_only, "list_products command");

    let products = state.database().products();
    let listings = match args.query.as_deref() {
        Some(query) => {
            let found = products.search(query).await?;
            if args.active_only {
                found.into_iter().filter(|l| l.product.is_active).collect()
            } else {
                found
            }
        }
        None => products.list_with_names(args.active_only).await?,
    };

    Ok(listings)
}

/// Creates a product from the admin form.
///
/// ## Behavior
/// - Name required; price between 0 and `MAX_PRICE_CENTS`; stock not negative
/// - `min_stock` defaults to 10
/// - Unknown category or recipe: `INVALID_REFERENCE`
pub async fn create_product(state: &AppState, args: ProductInput) -> Result<Product, ApiError> {
    let product = state.database().products().create(&args).await?;
    info!(id = %product.id, name = %product.name, "Product created");
    Ok(product)
}

/// Replaces every editable field. Lines already on the current order keep
/// the price they were added at.
pub async fn update_product(
    state: &AppState,
    args: UpdateProductArgs,
) -> Result<Product, ApiError> {
    let product = state
        .database()
        .products()
        .update(&args.id, &args.product)
        .await?;
    info!(id = %product.id, "Product updated");
    Ok(product)
}

/// A line for this product already in the current order can still be
/// removed, but not raised (`NOT_FOUND`).
pub async fn delete_product(state: &AppState, args: IdArgs) -> Result<(), ApiError> {
    state.database().products().delete(&args.id).await?;
    info!(id = %args.id, "Product deleted");
    Ok(())
}

pub async fn set_product_active(state: &AppState, args: ToggleArgs) -> Result<(), ApiError> {
    state
        .database()
        .products()
        .set_active(&args.id, args.is_active)
        .await?;
    Ok(())
}
