//! # Order Commands
//!
//! Manipulate the order being built at the register.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                         │
//! │  │  Empty   │────►│ In Order │────►│ Checkout │──► receipt, empty again │
//! │  │  Order   │     │          │     │          │                         │
//! │  └──────────┘     └──────────┘     └──────────┘                         │
//! │                        │                                                │
//! │                   add_to_order          (needs an open cash session)    │
//! │                   update_order_item                                     │
//! │                   remove_from_order                                     │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_order ──────────────────► (back to empty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use tracing::{debug, warn};

use caribe_core::order::OrderSnapshot;
use caribe_core::{CoreError, Product};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToOrderArgs {
    pub product_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderItemArgs {
    pub product_id: String,
    /// Below 1 removes the line.
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromOrderArgs {
    pub product_id: String,
}

/// Gets the current order contents.
pub async fn get_order(state: &AppState) -> Result<OrderSnapshot, ApiError> {
    debug!("get_order command");
    Ok(state.order.snapshot().await)
}

/// Adds one unit of a product to the order.
///
/// ## Behavior
/// - Rejected while no cash session is open
/// - Product already on the order: quantity increases by one
/// - Otherwise a new line at quantity 1 with the price frozen
/// - Stocked products cannot exceed what is on the shelf
pub async fn add_to_order(
    state: &AppState,
    args: AddToOrderArgs,
) -> Result<OrderSnapshot, ApiError> {
    debug!(product_id = %args.product_id, "add_to_order command");

    ensure_session_open(state).await?;
    let product = fetch_product(state, &args.product_id).await?;

    let mut order = state.order.lock().await;
    if let Err(err) = order.add_product(&product) {
        warn!(product = %product.name, error = %err, "Product not added");
        return Err(err.into());
    }

    Ok(OrderSnapshot::from(&*order))
}

/// Sets the quantity of a line.
pub async fn update_order_item(
    state: &AppState,
    args: UpdateOrderItemArgs,
) -> Result<OrderSnapshot, ApiError> {
    debug!(
        product_id = %args.product_id,
        quantity = args.quantity,
        "update_order_item command"
    );

    if args.quantity < 1 {
        let mut order = state.order.lock().await;
        order.update_quantity(&args.product_id, args.quantity)?;
        return Ok(OrderSnapshot::from(&*order));
    }

    // A deleted product cannot be counted against stock
    ensure_session_open(state).await?;
    let product = fetch_product(state, &args.product_id).await?;

    let mut order = state.order.lock().await;
    order.update_quantity_checked(&product, args.quantity)?;

    Ok(OrderSnapshot::from(&*order))
}

/// Removes a line from the order.
pub async fn remove_from_order(
    state: &AppState,
    args: RemoveFromOrderArgs,
) -> Result<OrderSnapshot, ApiError> {
    debug!(product_id = %args.product_id, "remove_from_order command");

    let mut order = state.order.lock().await;
    order.remove(&args.product_id)?;
    Ok(OrderSnapshot::from(&*order))
}

/// Clears all lines from the order.
pub async fn clear_order(state: &AppState) -> Result<OrderSnapshot, ApiError> {
    debug!("clear_order command");

    let mut order = state.order.lock().await;
    order.clear();
    Ok(OrderSnapshot::from(&*order))
}

/// Order entry needs an open session.
pub(crate) async fn ensure_session_open(state: &AppState) -> Result<(), ApiError> {
    match state.database().cash_sessions().current().await? {
        Some(_) => Ok(()),
        None => Err(CoreError::SessionClosed.into()),
    }
}

async fn fetch_product(state: &AppState, product_id: &str) -> Result<Product, ApiError> {
    state
        .database()
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))
}
