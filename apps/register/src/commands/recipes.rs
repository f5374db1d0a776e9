//! # Recipe Commands
//!
//! Recipe admin and preparation.
//!
//! ## Preparation Dialog
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Prepare: Arroz con pollo        Units: [ 4 ]                           │
//! │                                                                         │
//! │  Ingredient      Required     Available                                 │
//! │  Arroz           1 kg         25 kg          ✔                          │
//! │  Pollo           1.2 kg       0.9 kg         ✘   ◄── preview_preparation│
//! │                                                                         │
//! │                              [ Prepare ]     ◄── prepare_recipe         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use tracing::{debug, info};

use caribe_core::recipe::{PreparationOutcome, PreparationPlan};
use caribe_core::{Recipe, RecipeInput, RecipeItemDetail};

use super::{IdArgs, ToggleArgs};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListRecipesArgs {
    pub active_only: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeItemsArgs {
    pub recipe_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparationArgs {
    pub recipe_id: String,
    #[serde(default = "one")]
    pub multiplier: i64,
}

fn one() -> i64 {
    1
}

pub async fn list_recipes(state: &AppState, args: ListRecipesArgs) -> Result<Vec<Recipe>, ApiError> {
    debug!(active_only = args.active_only, "list_recipes command");
    Ok(state.database().recipes().list(args.active_only).await?)
}

/// Lines with ingredient name, unit and what is on hand.
pub async fn get_recipe_items(
    state: &AppState,
    args: RecipeItemsArgs,
) -> Result<Vec<RecipeItemDetail>, ApiError> {
    Ok(state.database().recipes().items(&args.recipe_id).await?)
}

/// Creates a recipe and its lines in one transaction.
///
/// ## Behavior
/// - Lines without an ingredient are dropped; an empty recipe is a
///   validation error
/// - An unknown ingredient fails with `INVALID_REFERENCE` and nothing is
///   written
pub async fn create_recipe(state: &AppState, args: RecipeInput) -> Result<Recipe, ApiError> {
    let recipe = state.database().recipes().create(&args).await?;
    info!(id = %recipe.id, name = %recipe.name, "Recipe created");
    Ok(recipe)
}

/// Inactive recipes can still be previewed, but not prepared.
pub async fn set_recipe_active(state: &AppState, args: ToggleArgs) -> Result<(), ApiError> {
    state
        .database()
        .recipes()
        .set_active(&args.id, args.is_active)
        .await?;
    Ok(())
}

/// Lines go with the recipe. Linked products stay on the menu without one.
pub async fn delete_recipe(state: &AppState, args: IdArgs) -> Result<(), ApiError> {
    state.database().recipes().delete(&args.id).await?;
    info!(id = %args.id, "Recipe deleted");
    Ok(())
}

/// Required vs available, nothing written.
///
/// Works for inactive recipes too, so the dialog can explain why
/// `prepare_recipe` would refuse.
pub async fn preview_preparation(
    state: &AppState,
    args: PreparationArgs,
) -> Result<PreparationPlan, ApiError> {
    Ok(state
        .database()
        .preparations()
        .preview(&args.recipe_id, args.multiplier)
        .await?)
}

/// Consumes ingredients and adds `multiplier` units to the linked product.
///
/// ## Behavior
/// ```text
/// multiplier outside 1..=1000 ──────────► VALIDATION_ERROR
/// recipe inactive or without lines ─────► RECIPE_UNAVAILABLE
/// any ingredient short ─────────────────► INSUFFICIENT_INGREDIENT
/// otherwise ────────────────────────────► ingredients down, product up,
///                                          recipe_used / recipe_produced logs
/// ```
/// All or nothing: a failure leaves ingredients, stock and the log untouched.
/// Without a linked product only the ingredients move.
pub async fn prepare_recipe(
    state: &AppState,
    args: PreparationArgs,
) -> Result<PreparationOutcome, ApiError> {
    let outcome = state
        .database()
        .preparations()
        .prepare(&args.recipe_id, args.multiplier)
        .await?;
    info!(recipe_id = %args.recipe_id, multiplier = args.multiplier, "Recipe prepared");
    Ok(outcome)
}
