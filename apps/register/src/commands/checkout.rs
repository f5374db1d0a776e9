//! # Checkout Command
//!
//! Persists the order and produces the receipt.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lock order ──► empty? ──────────────────────────► EMPTY order error    │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  open session? ── no ────────────────────────────► SESSION_CLOSED       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  orders().place_order  (one transaction)                                │
//! │      │     fails ──► order kept for retry ───────► error                │
//! │      ▼                                                                  │
//! │  Receipt::build from the in-memory lines                                │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  clear order, release lock ──────────────────────► { order, receipt }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use caribe_core::document::Receipt;
use caribe_core::{CoreError, Order};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResult {
    pub order: Order,
    pub receipt: Receipt,
}

/// Checks out the current order against the open cash session.
pub async fn checkout(state: &AppState) -> Result<CheckoutResult, ApiError> {
    let mut order = state.order.lock().await;
    order.ensure_ready_for_checkout()?;

    let session = state
        .database()
        .cash_sessions()
        .current()
        .await?
        .ok_or(CoreError::SessionClosed)?;

    let placed = match state
        .database()
        .orders()
        .place_order(&session.id, order.lines())
        .await
    {
        Ok(placed) => placed,
        Err(err) => {
            warn!(session_id = %session.id, error = %err, "Checkout failed; order kept");
            return Err(err.into());
        }
    };

    let receipt = Receipt::build(&placed.id, &state.config.business(), order.lines(), Utc::now());
    order.clear();

    info!(
        order_id = %placed.id,
        total = %state.config.format_currency(placed.total_cents),
        "Checkout complete"
    );

    Ok(CheckoutResult {
        order: placed,
        receipt,
    })
}
