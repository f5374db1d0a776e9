//! # Catalog Commands
//!
//! The menu the cashier taps on, and category admin.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  [ Bebidas ] [ Frituras ] [ Platos ] [ Other ]      ◄── groups          │
//! │  ┌────────────┐ ┌────────────┐ ┌────────────┐                           │
//! │  │ Malta      │ │ Coco frío  │ │ Agua       │                           │
//! │  │ $2.50      │ │ $3.50  LOW │ │ $1.50  OUT │      ◄── badges           │
//! │  └────────────┘ └────────────┘ └────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use tracing::{debug, info};

use caribe_core::catalog::Catalog;
use caribe_core::Category;

use super::IdArgs;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetCatalogArgs {
    /// Tab to reopen on, e.g. the one selected before a refresh.
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryArgs {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCategoryArgs {
    pub id: String,
    pub name: String,
}

/// Active products grouped by category.
///
/// ## Behavior
/// - Inactive products are left out; uncategorized ones land in "Other"
/// - Groups keep the repository's category order
/// - The requested `category` is selected when it still has products,
///   otherwise the first group is
pub async fn get_catalog(state: &AppState, args: GetCatalogArgs) -> Result<Catalog, ApiError> {
    let listings = state.database().products().list_with_names(true).await?;
    let mut catalog = Catalog::build(listings);

    if let Some(category) = args.category {
        if catalog.group(&category).is_some() {
            catalog.active_category = Some(category);
        }
    }

    debug!(
        groups = catalog.groups.len(),
        products = catalog.product_count(),
        "get_catalog command"
    );

    Ok(catalog)
}

/// Categories by name, for the admin screens.
pub async fn list_categories(state: &AppState) -> Result<Vec<Category>, ApiError> {
    Ok(state.database().categories().list().await?)
}

/// Names are unique; a repeat is `DUPLICATE`.
pub async fn create_category(
    state: &AppState,
    args: CreateCategoryArgs,
) -> Result<Category, ApiError> {
    let category = state.database().categories().create(&args.name).await?;
    info!(name = %category.name, "Category created");
    Ok(category)
}

pub async fn rename_category(
    state: &AppState,
    args: RenameCategoryArgs,
) -> Result<Category, ApiError> {
    Ok(state
        .database()
        .categories()
        .rename(&args.id, &args.name)
        .await?)
}

/// Products in the category move to "Other".
pub async fn delete_category(state: &AppState, args: IdArgs) -> Result<(), ApiError> {
    state.database().categories().delete(&args.id).await?;
    info!(id = %args.id, "Category deleted");
    Ok(())
}
