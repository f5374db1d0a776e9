//! # Cash Session
//!
//! Rules for the register's cash session.
//!
//! ## State Machine
//! ```text
//!              open_cash(opening ≥ 0)
//!   ┌────────┐ ───────────────────────► ┌────────┐
//!   │ Closed │                          │  Open  │ ◄──┐ checkout(total)
//!   └────────┘ ◄─────────────────────── └────────┘ ───┘ orders += 1
//!              close_cash(closing ≥ 0)                  sales  += total
//!
//!   Closed: order entry and checkout are rejected
//!   Open:   expected = opening + sales
//!           difference = closing - expected  (positive = surplus)
//! ```
//!
//! At most one session is open at a time. That rule needs the database to see
//! every session, so it is enforced in caribe-db; this module only knows about
//! the session in hand. The checkout counters are likewise incremented in SQL,
//! inside the checkout transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::CashSession;
use crate::validation::validate_balance_cents;

impl CashSession {
    /// Starts a new session with the counted drawer.
    pub fn open(opening_balance: Money, now: DateTime<Utc>) -> CoreResult<CashSession> {
        validate_balance_cents("opening balance", opening_balance.cents())?;
        Ok(CashSession {
            id: Uuid::new_v4().to_string(),
            opened_at: now,
            closed_at: None,
            opening_balance_cents: opening_balance.cents(),
            closing_balance_cents: None,
            total_orders: 0,
            total_sales_cents: 0,
        })
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    #[inline]
    pub fn opening_balance(&self) -> Money {
        Money::from_cents(self.opening_balance_cents)
    }

    #[inline]
    pub fn total_sales(&self) -> Money {
        Money::from_cents(self.total_sales_cents)
    }

    /// Cash that should be in the drawer: opening balance plus sales.
    pub fn expected_balance(&self) -> Money {
        self.opening_balance() + self.total_sales()
    }

    /// Closing count minus expected; `None` until the session is closed.
    pub fn difference(&self) -> Option<Money> {
        self.closing_balance_cents
            .map(|closing| Money::from_cents(closing) - self.expected_balance())
    }

    /// What the difference would be if the drawer counted `closing`.
    pub fn difference_for(&self, closing: Money) -> Money {
        closing - self.expected_balance()
    }

    /// Closes the session with the counted drawer.
    pub fn close(&mut self, closing_balance: Money, now: DateTime<Utc>) -> CoreResult<()> {
        if !self.is_open() {
            return Err(CoreError::SessionClosed);
        }
        validate_balance_cents("closing balance", closing_balance.cents())?;
        self.closed_at = Some(now);
        self.closing_balance_cents = Some(closing_balance.cents());
        Ok(())
    }
}

/// Register status as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashStatus {
    pub is_open: bool,
    pub session: Option<CashSession>,
    pub expected_balance_cents: Option<i64>,
    /// Difference a counted drawer would close with; only when a count was
    /// supplied and a session is open.
    pub counted_difference_cents: Option<i64>,
}

impl CashStatus {
    pub fn from_session(session: Option<CashSession>) -> Self {
        match session {
            Some(s) if s.is_open() => CashStatus {
                is_open: true,
                expected_balance_cents: Some(s.expected_balance().cents()),
                session: Some(s),
                counted_difference_cents: None,
            },
            _ => CashStatus {
                is_open: false,
                session: None,
                expected_balance_cents: None,
                counted_difference_cents: None,
            },
        }
    }

    /// Adds the would-be difference for a drawer count taken before closing.
    pub fn with_count(mut self, counted: Money) -> Self {
        self.counted_difference_cents = self
            .session
            .as_ref()
            .map(|s| s.difference_for(counted).cents());
        self
    }
}

/// Figures shown after a session is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CloseReport {
    pub session: CashSession,
    pub expected_balance_cents: i64,
    pub closing_balance_cents: i64,
    /// Positive = surplus, negative = shortage.
    pub difference_cents: i64,
}

impl CloseReport {
    /// Builds the report for a closed session; `None` if still open.
    pub fn for_session(session: CashSession) -> Option<Self> {
        let closing = session.closing_balance_cents?;
        let difference = session.difference()?;
        Some(CloseReport {
            expected_balance_cents: session.expected_balance().cents(),
            closing_balance_cents: closing,
            difference_cents: difference.cents(),
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_initializes_counters() {
        let session = CashSession::open(Money::from_cents(10_000), Utc::now()).unwrap();
        assert!(session.is_open());
        assert_eq!(session.opening_balance_cents, 10_000);
        assert_eq!(session.total_orders, 0);
        assert_eq!(session.total_sales_cents, 0);
        assert_eq!(session.difference(), None);
    }

    #[test]
    fn test_negative_opening_rejected() {
        let err = CashSession::open(Money::from_cents(-1), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_record_and_close() {
        let mut session = CashSession::open(Money::from_cents(10_000), Utc::now()).unwrap();
        session.total_orders = 2;
        session.total_sales_cents = 2_013;

        assert_eq!(session.expected_balance().cents(), 12_013);
        assert_eq!(session.difference_for(Money::from_cents(12_000)).cents(), -13);

        session.close(Money::from_cents(12_100), Utc::now()).unwrap();
        assert!(!session.is_open());
        assert_eq!(session.difference(), Some(Money::from_cents(87)));

        assert!(matches!(
            session.close(Money::zero(), Utc::now()),
            Err(CoreError::SessionClosed)
        ));
    }

    #[test]
    fn test_status_and_report() {
        let mut session = CashSession::open(Money::from_cents(5_000), Utc::now()).unwrap();
        session.total_orders = 1;
        session.total_sales_cents = 1_500;

        let status = CashStatus::from_session(Some(session.clone()));
        assert!(status.is_open);
        assert_eq!(status.expected_balance_cents, Some(6_500));
        assert_eq!(status.counted_difference_cents, None);

        let counted = status.with_count(Money::from_cents(6_550));
        assert_eq!(counted.counted_difference_cents, Some(50));
        assert_eq!(
            CashStatus::from_session(None)
                .with_count(Money::from_cents(100))
                .counted_difference_cents,
            None
        );
        assert!(CloseReport::for_session(session.clone()).is_none());

        session.close(Money::from_cents(6_400), Utc::now()).unwrap();
        let report = CloseReport::for_session(session.clone()).unwrap();
        assert_eq!(report.expected_balance_cents, 6_500);
        assert_eq!(report.difference_cents, -100);

        assert!(!CashStatus::from_session(Some(session)).is_open);
        assert!(!CashStatus::from_session(None).is_open);
    }
}
