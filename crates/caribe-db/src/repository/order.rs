//! # Order Repository
//!
//! Checkout persistence and the session's order history.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order(session_id, lines)                                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   1. UPDATE cash_sessions                                               │
//! │        total_orders += 1, total_sales += total                          │
//! │        WHERE id = ? AND closed_at IS NULL ── 0 rows ──► SessionClosed   │
//! │   2. INSERT order (items as JSON snapshot)                              │
//! │   3. for each line                                                      │
//! │        UPDATE products current_stock = MAX(stock - qty, 0)              │
//! │        INSERT inventory_logs 'sale'                                     │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error drops the transaction, which rolls everything back.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session row is written first so the transaction holds SQLite's write
//! lock from its first statement.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use caribe_core::{CoreError, Money, MovementType, Order, OrderLine, Quantity};

use super::generate_id;
use super::inventory_log::{append, new_entry};
use crate::error::{DbError, DbResult};

/// Row shape of `orders`; `items` is a JSON array.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    cash_session_id: String,
    items: String,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> DbResult<Order> {
        Ok(Order {
            items: serde_json::from_str(&row.items)?,
            id: row.id,
            cash_session_id: row.cash_session_id,
            total_cents: row.total_cents,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists a checkout atomically.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain(EmptyOrder))` - No lines
    /// * `Err(DbError::Domain(SessionClosed))` - Session closed meanwhile
    /// * `Err(DbError::NotFound)` - Session doesn't exist
    pub async fn place_order(&self, session_id: &str, lines: &[OrderLine]) -> DbResult<Order> {
        if lines.is_empty() {
            return Err(CoreError::EmptyOrder.into());
        }

        let now = Utc::now();
        let order = Order {
            id: generate_id(),
            cash_session_id: session_id.to_string(),
            items: lines.to_vec(),
            total_cents: lines.iter().map(OrderLine::line_total).sum::<Money>().cents(),
            created_at: now,
        };
        let items_json = serde_json::to_string(&order.items)?;

        debug!(
            order_id = %order.id,
            session_id = %session_id,
            lines = lines.len(),
            total_cents = order.total_cents,
            "Placing order"
        );

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE cash_sessions SET
                total_orders = total_orders + 1,
                total_sales_cents = total_sales_cents + ?2
            WHERE id = ?1 AND closed_at IS NULL
            "#,
        )
        .bind(session_id)
        .bind(order.total_cents)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let exists: Option<String> =
                sqlx::query_scalar("SELECT id FROM cash_sessions WHERE id = ?1")
                    .bind(session_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(match exists {
                Some(_) => CoreError::SessionClosed.into(),
                None => DbError::not_found("Cash session", session_id),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO orders (id, cash_session_id, items, total_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&order.id)
        .bind(&order.cash_session_id)
        .bind(&items_json)
        .bind(order.total_cents)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &order.items {
            let result = sqlx::query(
                r#"
                UPDATE products SET
                    current_stock = MAX(current_stock - ?2, 0),
                    updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!(
                    product_id = %line.product_id,
                    product = %line.product_name,
                    "Product deleted before checkout; no stock to deduct"
                );
                continue;
            }

            let mut entry = new_entry(MovementType::Sale, Quantity::from_units(line.quantity), now);
            entry.product_id = Some(line.product_id.clone());
            entry.order_id = Some(order.id.clone());
            append(&mut tx, &entry).await?;
        }

        tx.commit().await?;

        info!(
            order_id = %order.id,
            session_id = %session_id,
            total = %order.total(),
            "Order placed"
        );

        Ok(order)
    }

    /// Orders of a session, newest first.
    pub async fn list_for_session(&self, session_id: &str) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, cash_session_id, items, total_cents, created_at
            FROM orders
            WHERE cash_session_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, cash_session_id, items, total_cents, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }
}
