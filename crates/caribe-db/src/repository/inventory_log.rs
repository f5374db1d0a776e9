//! # Inventory Log Repository
//!
//! The append-only stock movement history. Entries are written by the
//! workflows that move stock (checkout, recipe preparation, manual
//! adjustment) on their own transaction, through [`append`].
//!
//! ```text
//!  movement_type     ingredient_id  product_id  quantity_milli  written by
//!  ───────────────   ─────────────  ──────────  ──────────────  ──────────────
//!  recipe_used       ✔                          consumed        preparation
//!  recipe_produced                  ✔           units × 1000    preparation
//!  sale                             ✔           units × 1000    checkout
//!  adjustment        ✔                          signed delta    adjust_ingredient
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use caribe_core::{InventoryLog, MovementType, Quantity};

use super::generate_id;
use crate::error::DbResult;

/// Builds a log entry with no subject set yet.
pub(crate) fn new_entry(
    movement_type: MovementType,
    quantity: Quantity,
    now: DateTime<Utc>,
) -> InventoryLog {
    InventoryLog {
        id: generate_id(),
        ingredient_id: None,
        product_id: None,
        movement_type,
        quantity_milli: quantity.milli(),
        recipe_id: None,
        order_id: None,
        notes: None,
        created_at: now,
    }
}

/// Appends an entry on the caller's connection or transaction.
pub(crate) async fn append(conn: &mut SqliteConnection, entry: &InventoryLog) -> DbResult<()> {
    debug!(
        movement = ?entry.movement_type,
        ingredient_id = ?entry.ingredient_id,
        product_id = ?entry.product_id,
        quantity_milli = entry.quantity_milli,
        "Appending inventory log"
    );

    sqlx::query(
        r#"
        INSERT INTO inventory_logs (
            id, ingredient_id, product_id, movement_type, quantity_milli,
            recipe_id, order_id, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.ingredient_id)
    .bind(&entry.product_id)
    .bind(entry.movement_type)
    .bind(entry.quantity_milli)
    .bind(&entry.recipe_id)
    .bind(&entry.order_id)
    .bind(&entry.notes)
    .bind(entry.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Repository for reading the inventory log.
#[derive(Debug, Clone)]
pub struct InventoryLogRepository {
    pool: SqlitePool,
}

impl InventoryLogRepository {
    /// Creates a new InventoryLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryLogRepository { pool }
    }

    /// Most recent entries first.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<InventoryLog>> {
        let logs = sqlx::query_as::<_, InventoryLog>(
            r#"
            SELECT id, ingredient_id, product_id, movement_type, quantity_milli,
                   recipe_id, order_id, notes, created_at
            FROM inventory_logs
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Entries written by preparations of one recipe, most recent first.
    pub async fn for_recipe(&self, recipe_id: &str, limit: u32) -> DbResult<Vec<InventoryLog>> {
        let logs = sqlx::query_as::<_, InventoryLog>(
            r#"
            SELECT id, ingredient_id, product_id, movement_type, quantity_milli,
                   recipe_id, order_id, notes, created_at
            FROM inventory_logs
            WHERE recipe_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(recipe_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Counts entries (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_logs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    use super::*;

    #[tokio::test]
    async fn test_append_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let mut entry = new_entry(MovementType::Adjustment, Quantity::from_milli(-500), Utc::now());
        entry.notes = Some("Spoiled".to_string());
        append(&mut conn, &entry).await.unwrap();
        drop(conn);

        let logs = db.inventory_logs().recent(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].movement_type, MovementType::Adjustment);
        assert_eq!(logs[0].quantity_milli, -500);
        assert_eq!(logs[0].notes.as_deref(), Some("Spoiled"));
        assert_eq!(db.inventory_logs().count().await.unwrap(), 1);
    }
}
