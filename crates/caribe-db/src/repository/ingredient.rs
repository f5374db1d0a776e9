//! # Ingredient Repository
//!
//! Raw stock that recipes consume. Quantities are stored in thousandths of
//! the ingredient's unit (`*_milli` columns).
//!
//! ## Manual Adjustment
//! ```text
//!   adjust(id, current, min)
//!        │
//!        ├── BEGIN
//!        ├── SELECT ingredient                         (NotFound)
//!        ├── UPDATE current/min
//!        ├── delta = current - before ── 0? ──► no log entry
//!        │                    └──────── else ► INSERT adjustment log
//!        └── COMMIT
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use caribe_core::inventory::{adjustment_delta, InventoryDashboard};
use caribe_core::validation::{validate_non_negative, validate_search_query};
use caribe_core::{Ingredient, IngredientInput, MovementType, Quantity};

use super::generate_id;
use super::inventory_log::{append, new_entry};
use crate::error::{DbError, DbResult};

const SELECT_INGREDIENT: &str = r#"
    SELECT id, name, description, unit, current_quantity_milli, min_quantity_milli,
           cost_per_unit_cents, created_at, updated_at
    FROM ingredients
"#;

/// Repository for ingredient database operations.
#[derive(Debug, Clone)]
pub struct IngredientRepository {
    pool: SqlitePool,
}

impl IngredientRepository {
    /// Creates a new IngredientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IngredientRepository { pool }
    }

    /// Lists all ingredients by name.
    pub async fn list(&self) -> DbResult<Vec<Ingredient>> {
        let sql = format!("{SELECT_INGREDIENT} ORDER BY name");
        let ingredients = sqlx::query_as::<_, Ingredient>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(ingredients)
    }

    /// Case-insensitive search on ingredient name.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Ingredient>> {
        let query = validate_search_query(query)?;
        if query.is_empty() {
            return self.list().await;
        }

        debug!(query = %query, "Searching ingredients");

        let sql = format!("{SELECT_INGREDIENT} WHERE LOWER(name) LIKE ?1 ORDER BY name");
        let ingredients = sqlx::query_as::<_, Ingredient>(&sql)
            .bind(format!("%{}%", query.to_lowercase()))
            .fetch_all(&self.pool)
            .await?;

        Ok(ingredients)
    }

    /// Gets an ingredient by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Ingredient>> {
        let sql = format!("{SELECT_INGREDIENT} WHERE id = ?1");
        let ingredient = sqlx::query_as::<_, Ingredient>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ingredient)
    }

    /// Creates an ingredient. The unit defaults to `kg`.
    pub async fn create(&self, input: &IngredientInput) -> DbResult<Ingredient> {
        input.validate()?;
        let now = Utc::now();
        let ingredient = Ingredient {
            id: generate_id(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            unit: input.unit_or_default(),
            current_quantity_milli: input.current_quantity_milli,
            min_quantity_milli: input.min_quantity_milli,
            cost_per_unit_cents: input.cost_per_unit_cents,
            created_at: now,
            updated_at: now,
        };

        debug!(name = %ingredient.name, unit = %ingredient.unit, "Inserting ingredient");

        sqlx::query(
            r#"
            INSERT INTO ingredients (
                id, name, description, unit, current_quantity_milli, min_quantity_milli,
                cost_per_unit_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&ingredient.id)
        .bind(&ingredient.name)
        .bind(&ingredient.description)
        .bind(&ingredient.unit)
        .bind(ingredient.current_quantity_milli)
        .bind(ingredient.min_quantity_milli)
        .bind(ingredient.cost_per_unit_cents)
        .bind(ingredient.created_at)
        .bind(ingredient.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(ingredient)
    }

    /// Sets current and minimum quantity directly.
    ///
    /// A change to the current quantity is recorded as an `adjustment`
    /// inventory log entry carrying the signed delta.
    pub async fn adjust(
        &self,
        id: &str,
        current: Quantity,
        min: Quantity,
        note: Option<String>,
    ) -> DbResult<Ingredient> {
        validate_non_negative("current quantity", current.milli())?;
        validate_non_negative("minimum quantity", min.milli())?;

        let mut tx = self.pool.begin().await?;

        let sql = format!("{SELECT_INGREDIENT} WHERE id = ?1");
        let before = sqlx::query_as::<_, Ingredient>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Ingredient", id))?;

        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE ingredients SET
                current_quantity_milli = ?2,
                min_quantity_milli = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(current.milli())
        .bind(min.milli())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let delta = adjustment_delta(before.current_quantity(), current);
        if delta != Quantity::zero() {
            let mut entry = new_entry(MovementType::Adjustment, delta, now);
            entry.ingredient_id = Some(id.to_string());
            entry.notes = Some(note.unwrap_or_else(|| "Manual adjustment".to_string()));
            append(&mut tx, &entry).await?;
        }

        tx.commit().await?;

        info!(
            ingredient = %before.name,
            before = %before.current_quantity(),
            after = %current,
            unit = %before.unit,
            "Ingredient adjusted"
        );

        Ok(Ingredient {
            current_quantity_milli: current.milli(),
            min_quantity_milli: min.milli(),
            updated_at: now,
            ..before
        })
    }

    /// Deletes an ingredient.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - A recipe still uses it
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting ingredient");

        let result = sqlx::query("DELETE FROM ingredients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ingredient", id));
        }

        Ok(())
    }

    /// Ingredients at or below their minimum, by name.
    pub async fn low_stock(&self) -> DbResult<Vec<Ingredient>> {
        let sql = format!(
            "{SELECT_INGREDIENT} WHERE current_quantity_milli <= min_quantity_milli ORDER BY name"
        );
        let ingredients = sqlx::query_as::<_, Ingredient>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(ingredients)
    }

    /// Header figures for the inventory screen.
    pub async fn dashboard(&self) -> DbResult<InventoryDashboard> {
        let ingredients = self.list().await?;
        Ok(InventoryDashboard::from_ingredients(&ingredients))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    use super::*;

    fn input(name: &str, current_milli: i64, min_milli: i64) -> IngredientInput {
        IngredientInput {
            name: name.to_string(),
            description: None,
            unit: None,
            current_quantity_milli: current_milli,
            min_quantity_milli: min_milli,
            cost_per_unit_cents: 200,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_unit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let rice = db.ingredients().create(&input("Arroz", 5_000, 1_000)).await.unwrap();
        assert_eq!(rice.unit, "kg");

        let fetched = db.ingredients().get_by_id(&rice.id).await.unwrap().unwrap();
        assert_eq!(fetched.current_quantity(), Quantity::from_units(5));
    }

    #[tokio::test]
    async fn test_adjust_logs_delta() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let rice = db.ingredients().create(&input("Arroz", 5_000, 1_000)).await.unwrap();

        let adjusted = db
            .ingredients()
            .adjust(&rice.id, Quantity::from_milli(3_500), Quantity::from_units(2), None)
            .await
            .unwrap();
        assert_eq!(adjusted.current_quantity_milli, 3_500);
        assert_eq!(adjusted.min_quantity_milli, 2_000);

        let logs = db.inventory_logs().recent(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].movement_type, MovementType::Adjustment);
        assert_eq!(logs[0].quantity_milli, -1_500);
        assert_eq!(logs[0].ingredient_id.as_deref(), Some(rice.id.as_str()));

        // Changing only the minimum writes no entry
        db.ingredients()
            .adjust(&rice.id, Quantity::from_milli(3_500), Quantity::from_units(1), None)
            .await
            .unwrap();
        assert_eq!(db.inventory_logs().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_adjust_missing_ingredient() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(matches!(
            db.ingredients()
                .adjust("missing", Quantity::zero(), Quantity::zero(), None)
                .await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_low_stock_search_and_dashboard() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.ingredients().create(&input("Arroz", 5_000, 1_000)).await.unwrap();
        db.ingredients().create(&input("Habichuelas", 1_000, 1_000)).await.unwrap();
        db.ingredients().create(&input("Pollo", 500, 2_000)).await.unwrap();

        let low: Vec<_> = db
            .ingredients()
            .low_stock()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(low, vec!["Habichuelas", "Pollo"]);

        assert_eq!(db.ingredients().search("POLL").await.unwrap().len(), 1);

        let dashboard = db.ingredients().dashboard().await.unwrap();
        assert_eq!(dashboard.total_ingredients, 3);
        assert_eq!(dashboard.low_stock_count, 2);
        // (5 + 1 + 0.5) × $2.00
        assert_eq!(dashboard.inventory_value_cents, 1_300);
    }
}
