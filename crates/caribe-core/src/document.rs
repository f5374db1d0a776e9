//! # Documents
//!
//! Printable documents, as data. The renderer owns the HTML/PDF layout; this
//! module decides *what* is on the page.
//!
//! ## Receipt Layout
//! ```text
//! ┌────────────────────────────┐  ┌────────────────────────────┐
//! │ PARADA CARIBE              │  │ PARADA CARIBE              │
//! │ Your favourite Caribbean.. │  │ Your favourite Caribbean.. │
//! │ ── Customer copy ───────── │  │ ── Business copy ───────── │
//! │ Mofongo        x2   18.00  │  │ Mofongo        x2   18.00  │
//! │ Malta          x1    2.50  │  │ Malta          x1    2.50  │
//! │ TOTAL               20.50  │  │ TOTAL               20.50  │
//! │ 2026-10-17 13:05           │  │ 2026-10-17 13:05           │
//! └────────────────────────────┘  └────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CashSession, Order, OrderLine};

/// Header printed on every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BusinessInfo {
    pub name: String,
    pub tagline: String,
}

// =============================================================================
// Receipt
// =============================================================================

/// Which of the two printed copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CopyKind {
    Customer,
    Business,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub line_total_cents: i64,
}

impl From<&OrderLine> for ReceiptLine {
    fn from(line: &OrderLine) -> Self {
        ReceiptLine {
            name: line.product_name.clone(),
            quantity: line.quantity,
            line_total_cents: line.line_total().cents(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptCopy {
    pub kind: CopyKind,
    pub business_name: String,
    pub tagline: String,
    pub lines: Vec<ReceiptLine>,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub printed_at: DateTime<Utc>,
}

/// A checkout receipt, printed in a customer and a business copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    pub order_id: String,
    pub copies: Vec<ReceiptCopy>,
}

impl Receipt {
    /// Builds the receipt from the lines that were on the order.
    pub fn build(
        order_id: &str,
        business: &BusinessInfo,
        lines: &[OrderLine],
        printed_at: DateTime<Utc>,
    ) -> Self {
        let receipt_lines: Vec<ReceiptLine> = lines.iter().map(ReceiptLine::from).collect();
        let total: Money = lines.iter().map(OrderLine::line_total).sum();

        let copies = [CopyKind::Customer, CopyKind::Business]
            .into_iter()
            .map(|kind| ReceiptCopy {
                kind,
                business_name: business.name.clone(),
                tagline: business.tagline.clone(),
                lines: receipt_lines.clone(),
                total_cents: total.cents(),
                printed_at,
            })
            .collect();

        Receipt {
            order_id: order_id.to_string(),
            copies,
        }
    }
}

// =============================================================================
// Session Summary
// =============================================================================

/// Printable summary of a cash session and its orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSummary {
    pub business_name: String,
    pub session_id: String,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
    pub opening_balance_cents: i64,
    pub total_orders: i64,
    pub total_sales_cents: i64,
    pub expected_balance_cents: i64,
    /// Newest first.
    pub orders: Vec<Order>,
    #[ts(as = "String")]
    pub generated_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn build(
        business: &BusinessInfo,
        session: &CashSession,
        mut orders: Vec<Order>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        SessionSummary {
            business_name: business.name.clone(),
            session_id: session.id.clone(),
            opened_at: session.opened_at,
            closed_at: session.closed_at,
            opening_balance_cents: session.opening_balance_cents,
            total_orders: session.total_orders,
            total_sales_cents: session.total_sales_cents,
            expected_balance_cents: session.expected_balance().cents(),
            orders,
            generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn business() -> BusinessInfo {
        BusinessInfo {
            name: "Parada Caribe".to_string(),
            tagline: "Your favourite Caribbean flavour".to_string(),
        }
    }

    fn line(name: &str, qty: i64, price: i64) -> OrderLine {
        OrderLine {
            product_id: name.to_lowercase(),
            product_name: name.to_string(),
            quantity: qty,
            unit_price_cents: price,
        }
    }

    #[test]
    fn test_receipt_has_two_identical_copies() {
        let receipt = Receipt::build(
            "o1",
            &business(),
            &[line("Mofongo", 2, 900), line("Malta", 1, 250)],
            Utc::now(),
        );

        assert_eq!(receipt.copies.len(), 2);
        assert_eq!(receipt.copies[0].kind, CopyKind::Customer);
        assert_eq!(receipt.copies[1].kind, CopyKind::Business);
        assert_eq!(receipt.copies[0].lines, receipt.copies[1].lines);
        assert_eq!(receipt.copies[0].lines[0].line_total_cents, 1_800);
        assert_eq!(receipt.copies[0].total_cents, 2_050);
        assert_eq!(receipt.copies[1].total_cents, 2_050);
        assert_eq!(receipt.copies[1].business_name, "Parada Caribe");
    }

    #[test]
    fn test_summary_orders_newest_first() {
        let mut session = CashSession::open(Money::from_cents(1_000), Utc::now()).unwrap();
        session.total_orders = 2;
        session.total_sales_cents = 1_200;

        let now = Utc::now();
        let order = |id: &str, total: i64, at: DateTime<Utc>| Order {
            id: id.to_string(),
            cash_session_id: session.id.clone(),
            items: vec![],
            total_cents: total,
            created_at: at,
        };
        let orders = vec![
            order("first", 500, now - Duration::minutes(10)),
            order("second", 700, now),
        ];

        let summary = SessionSummary::build(&business(), &session, orders, now);
        assert_eq!(summary.orders[0].id, "second");
        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.expected_balance_cents, 2_200);
    }
}
