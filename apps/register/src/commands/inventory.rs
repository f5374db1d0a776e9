//! # Inventory Commands
//!
//! Ingredients, the inventory dashboard and the movement log.
//!
//! ## Inventory Screen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ingredients: 8        Low stock: 2        Value: $412.50               │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │  Arroz          25 kg      min 5 kg                                     │
//! │  Sofrito        0.8 kg     min 1 kg     LOW    [Adjust]                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every change to an on-hand quantity leaves an inventory log entry:
//! `adjustment` from this screen, `sale` from checkout, and
//! `recipe_used` / `recipe_produced` from preparations.

use serde::Deserialize;
use tracing::{debug, info};

use caribe_core::inventory::InventoryDashboard;
use caribe_core::{Ingredient, IngredientInput, InventoryLog, Quantity};

use super::IdArgs;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LOG_LIMIT: u32 = 50;
const MAX_LOG_LIMIT: u32 = 500;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListIngredientsArgs {
    pub query: Option<String>,
    /// Only ingredients at or below their minimum.
    pub low_stock_only: bool,
}

/// Quantities come either as thousandths or as a decimal string in the
/// ingredient's unit (`"2.5"` kg). The string wins when both are sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustIngredientArgs {
    pub id: String,
    #[serde(default)]
    pub current_quantity_milli: Option<i64>,
    #[serde(default)]
    pub current_quantity: Option<String>,
    #[serde(default)]
    pub min_quantity_milli: Option<i64>,
    #[serde(default)]
    pub min_quantity: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListInventoryLogsArgs {
    /// Only entries written by preparations of this recipe.
    pub recipe_id: Option<String>,
    pub limit: Option<u32>,
}

/// Ingredients by name.
///
/// ## Behavior
/// - `query`: case-insensitive substring match on the name
/// - `lowStockOnly`: only rows at or below their minimum; combines with
///   `query`
pub async fn list_ingredients(
    state: &AppState,
    args: ListIngredientsArgs,
) -> Result<Vec<Ingredient>, ApiError> {
    debug!(query = ?args.query, low_stock_only = args.low_stock_only, "list_ingredients command");

    let repo = state.database().ingredients();
    let mut ingredients = match args.query.as_deref() {
        Some(query) => repo.search(query).await?,
        None if args.low_stock_only => return Ok(repo.low_stock().await?),
        None => repo.list().await?,
    };
    if args.low_stock_only {
        ingredients.retain(Ingredient::is_low_stock);
    }

    Ok(ingredients)
}

/// Blank unit becomes `kg`. Quantities and cost must not be negative.
pub async fn create_ingredient(
    state: &AppState,
    args: IngredientInput,
) -> Result<Ingredient, ApiError> {
    let ingredient = state.database().ingredients().create(&args).await?;
    info!(id = %ingredient.id, name = %ingredient.name, "Ingredient created");
    Ok(ingredient)
}

/// Direct edit of current and minimum quantity.
///
/// ## Behavior
/// - Each quantity may be sent as `...Milli` or as a decimal string
/// - A missing current or minimum quantity is a validation error
/// - A changed current quantity writes a manual-adjustment log entry with
///   the signed delta and the optional note
pub async fn adjust_ingredient(
    state: &AppState,
    args: AdjustIngredientArgs,
) -> Result<Ingredient, ApiError> {
    debug!(id = %args.id, "adjust_ingredient command");

    let current = quantity_arg(
        "current quantity",
        args.current_quantity.as_deref(),
        args.current_quantity_milli,
    )?;
    let min = quantity_arg("min quantity", args.min_quantity.as_deref(), args.min_quantity_milli)?;

    let ingredient = state
        .database()
        .ingredients()
        .adjust(&args.id, current, min, args.note)
        .await?;
    info!(id = %ingredient.id, current = %current, "Ingredient adjusted");
    Ok(ingredient)
}

/// Fails while a recipe still uses the ingredient.
pub async fn delete_ingredient(state: &AppState, args: IdArgs) -> Result<(), ApiError> {
    state.database().ingredients().delete(&args.id).await?;
    info!(id = %args.id, "Ingredient deleted");
    Ok(())
}

/// Ingredient count, low-stock count and stock value at cost.
pub async fn get_inventory_dashboard(state: &AppState) -> Result<InventoryDashboard, ApiError> {
    Ok(state.database().ingredients().dashboard().await?)
}

/// Newest first. `limit` defaults to 50 and is clamped to 1..=500.
pub async fn list_inventory_logs(
    state: &AppState,
    args: ListInventoryLogsArgs,
) -> Result<Vec<InventoryLog>, ApiError> {
    let limit = args.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
    let logs = state.database().inventory_logs();

    Ok(match args.recipe_id.as_deref() {
        Some(recipe_id) => logs.for_recipe(recipe_id, limit).await?,
        None => logs.recent(limit).await?,
    })
}

fn quantity_arg(field: &str, text: Option<&str>, milli: Option<i64>) -> Result<Quantity, ApiError> {
    match (text, milli) {
        (Some(text), _) => Quantity::parse(text)
            .map_err(|e| ApiError::validation(format!("{}: {}", field, e))),
        (None, Some(milli)) => Ok(Quantity::from_milli(milli)),
        (None, None) => Err(ApiError::validation(format!("{} is required", field))),
    }
}
