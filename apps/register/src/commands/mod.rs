//! # Commands Module
//!
//! All commands exposed to the renderer.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (dispatch)
//! ├── catalog.rs    ◄─── Menu and categories
//! ├── order.rs      ◄─── In-memory order manipulation
//! ├── checkout.rs   ◄─── Checkout and receipt
//! ├── cash.rs       ◄─── Cash session open/close/summary
//! ├── products.rs   ◄─── Product admin
//! ├── inventory.rs  ◄─── Ingredients, dashboard, inventory log
//! ├── recipes.rs    ◄─── Recipe admin and preparation
//! └── config.rs     ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Renderer writes one line                                               │
//! │  {"id": 7, "command": "add_to_order", "args": {"productId": "..."}}     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dispatch(state, "add_to_order", args)                                  │
//! │         │  args deserialized into the command's Args struct             │
//! │         ▼                                                               │
//! │  order::add_to_order(&state, AddToOrderArgs) -> Result<T, ApiError>     │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  {"id": 7, "ok": true, "data": {...}}                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cash;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod inventory;
pub mod order;
pub mod products;
pub mod recipes;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

/// Arguments naming a single record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdArgs {
    pub id: String,
}

/// Arguments for show/hide toggles.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleArgs {
    pub id: String,
    pub is_active: bool,
}

/// Routes a command name to its handler.
pub async fn dispatch(state: &AppState, command: &str, args: Value) -> Result<Value, ApiError> {
    debug!(command = %command, "dispatch");

    match command {
        // Catalog
        "get_catalog" => respond(catalog::get_catalog(state, parse(args)?).await),
        "list_categories" => respond(catalog::list_categories(state).await),
        "create_category" => respond(catalog::create_category(state, parse(args)?).await),
        "rename_category" => respond(catalog::rename_category(state, parse(args)?).await),
        "delete_category" => respond(catalog::delete_category(state, parse(args)?).await),
        // Order
        "get_order" => respond(order::get_order(state).await),
        "add_to_order" => respond(order::add_to_order(state, parse(args)?).await),
        "update_order_item" => respond(order::update_order_item(state, parse(args)?).await),
        "remove_from_order" => respond(order::remove_from_order(state, parse(args)?).await),
        "clear_order" => respond(order::clear_order(state).await),
        "checkout" => respond(checkout::checkout(state).await),
        // Cash session
        "get_cash_status" => respond(cash::get_cash_status(state, parse(args)?).await),
        "open_cash" => respond(cash::open_cash(state, parse(args)?).await),
        "close_cash" => respond(cash::close_cash(state, parse(args)?).await),
        "get_session_summary" => respond(cash::get_session_summary(state).await),
        // Products
        "list_products" => respond(products::list_products(state, parse(args)?).await),
        "create_product" => respond(products::create_product(state, parse(args)?).await),
        "update_product" => respond(products::update_product(state, parse(args)?).await),
        "delete_product" => respond(products::delete_product(state, parse(args)?).await),
        "set_product_active" => respond(products::set_product_active(state, parse(args)?).await),
        // Ingredients
        "list_ingredients" => respond(inventory::list_ingredients(state, parse(args)?).await),
        "create_ingredient" => respond(inventory::create_ingredient(state, parse(args)?).await),
        "adjust_ingredient" => respond(inventory::adjust_ingredient(state, parse(args)?).await),
        "delete_ingredient" => respond(inventory::delete_ingredient(state, parse(args)?).await),
        "get_inventory_dashboard" => respond(inventory::get_inventory_dashboard(state).await),
        "list_inventory_logs" => {
            respond(inventory::list_inventory_logs(state, parse(args)?).await)
        }
        // Recipes
        "list_recipes" => respond(recipes::list_recipes(state, parse(args)?).await),
        "get_recipe_items" => respond(recipes::get_recipe_items(state, parse(args)?).await),
        "create_recipe" => respond(recipes::create_recipe(state, parse(args)?).await),
        "set_recipe_active" => respond(recipes::set_recipe_active(state, parse(args)?).await),
        "delete_recipe" => respond(recipes::delete_recipe(state, parse(args)?).await),
        "preview_preparation" => {
            respond(recipes::preview_preparation(state, parse(args)?).await)
        }
        "prepare_recipe" => respond(recipes::prepare_recipe(state, parse(args)?).await),
        // Config
        "get_config" => respond(Ok(config::get_config(state))),
        other => Err(ApiError::new(
            ErrorCode::UnknownCommand,
            format!("Unknown command: {}", other),
        )),
    }
}

/// Deserializes command arguments. A missing `args` reads as `{}`.
fn parse<T: DeserializeOwned>(args: Value) -> Result<T, ApiError> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    Ok(serde_json::from_value(args)?)
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> Result<Value, ApiError> {
    serde_json::to_value(result?).map_err(|e| {
        tracing::error!("Response serialization failed: {}", e);
        ApiError::internal("Response could not be encoded")
    })
}
