//! # Cash Session Commands
//!
//! Open and close the drawer, and the session summary.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use caribe_core::document::SessionSummary;
use caribe_core::session::{CashStatus, CloseReport};
use caribe_core::validation::validate_balance_cents;
use caribe_core::{CashSession, CoreError, Money, Order};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCashArgs {
    pub opening_balance_cents: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashStatusArgs {
    /// Drawer counted so far, to preview the closing difference.
    pub counted_balance_cents: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseCashArgs {
    pub closing_balance_cents: i64,
}

/// Open session figures plus its orders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryView {
    pub session: CashSession,
    pub expected_balance_cents: i64,
    /// Newest first.
    pub orders: Vec<Order>,
    /// Printable document.
    pub document: SessionSummary,
}

/// Whether a session is open, with its expected drawer.
///
/// ## Behavior
/// - No open session: `is_open` false and every figure empty
/// - With `countedBalanceCents`: also reports the difference closing with
///   that count would produce, without closing anything
pub async fn get_cash_status(
    state: &AppState,
    args: CashStatusArgs,
) -> Result<CashStatus, ApiError> {
    debug!(counted = ?args.counted_balance_cents, "get_cash_status command");

    let session = state.database().cash_sessions().current().await?;
    let status = CashStatus::from_session(session);

    Ok(match args.counted_balance_cents {
        Some(counted) => {
            validate_balance_cents("counted balance", counted).map_err(CoreError::from)?;
            status.with_count(Money::from_cents(counted))
        }
        None => status,
    })
}

pub async fn open_cash(state: &AppState, args: OpenCashArgs) -> Result<CashSession, ApiError> {
    Ok(state
        .database()
        .cash_sessions()
        .open(Money::from_cents(args.opening_balance_cents))
        .await?)
}

/// Closes the session and reports expected balance and difference.
pub async fn close_cash(state: &AppState, args: CloseCashArgs) -> Result<CloseReport, ApiError> {
    let session = state
        .database()
        .cash_sessions()
        .close(Money::from_cents(args.closing_balance_cents))
        .await?;

    CloseReport::for_session(session)
        .ok_or_else(|| ApiError::internal("Closed session has no closing balance"))
}

pub async fn get_session_summary(state: &AppState) -> Result<SessionSummaryView, ApiError> {
    let session = state
        .database()
        .cash_sessions()
        .current()
        .await?
        .ok_or(CoreError::NoOpenSession)?;
    let orders = state.database().orders().list_for_session(&session.id).await?;

    let document = SessionSummary::build(&state.config.business(), &session, orders, Utc::now());

    Ok(SessionSummaryView {
        expected_balance_cents: session.expected_balance().cents(),
        orders: document.orders.clone(),
        session,
        document,
    })
}
