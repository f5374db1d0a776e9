//! # Recipe Preparation
//!
//! Turns ingredients into sellable stock.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  prepare(recipe_id, multiplier)                                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── load recipe + lines                   NotFound / RecipeHasNoItems │
//! │   ├── PreparationPlan::check()              RecipeInactive              │
//! │   │                                         InsufficientIngredient      │
//! │   ├── for each ingredient (repeated lines summed)                       │
//! │   │     UPDATE ingredients                                              │
//! │   │       SET current -= required                                       │
//! │   │       WHERE current >= required ── 0 rows ──► InsufficientIngredient│
//! │   │     INSERT log 'recipe_used'                                        │
//! │   ├── linked product? (first by created_at)                             │
//! │   │     UPDATE products SET stock += multiplier                         │
//! │   │     INSERT log 'recipe_produced'                                    │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional decrement re-checks every line at write time, so a
//! concurrent preparation that drained an ingredient after the plan was
//! built still fails the whole operation instead of overdrawing it.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use caribe_core::recipe::{
    Consumption, PreparationOutcome, PreparationPlan, ProducedStock, Requirement,
};
use caribe_core::{CoreError, MovementType, Quantity};

use super::inventory_log::{append, new_entry};
use super::recipe::{fetch_items, fetch_recipe};
use crate::error::{DbError, DbResult};

/// Recipe preparation against the live inventory.
#[derive(Debug, Clone)]
pub struct PreparationRepository {
    pool: SqlitePool,
}

impl PreparationRepository {
    /// Creates a new PreparationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PreparationRepository { pool }
    }

    /// Required vs available per ingredient, without writing.
    pub async fn preview(&self, recipe_id: &str, multiplier: i64) -> DbResult<PreparationPlan> {
        let mut conn = self.pool.acquire().await?;
        load_plan(&mut conn, recipe_id, multiplier).await
    }

    /// Prepares `multiplier` units of a recipe.
    ///
    /// Nothing is written unless every ingredient covers its requirement.
    pub async fn prepare(&self, recipe_id: &str, multiplier: i64) -> DbResult<PreparationOutcome> {
        debug!(recipe_id = %recipe_id, multiplier, "Preparing recipe");

        let mut tx = self.pool.begin().await?;

        let plan = load_plan(&mut tx, recipe_id, multiplier).await?;
        if let Err(err) = plan.check() {
            warn!(recipe = %plan.recipe_name, multiplier, error = %err, "Preparation rejected");
            return Err(err.into());
        }

        let now = Utc::now();
        let note = plan.log_note();
        let mut consumed = Vec::with_capacity(plan.requirements.len());

        for req in &plan.requirements {
            if let Err(err) = deduct(&mut tx, req, now).await {
                warn!(recipe = %plan.recipe_name, error = %err, "Ingredient drained during preparation");
                return Err(err);
            }

            let remaining = current_quantity(&mut tx, &req.ingredient_id)
                .await?
                .ok_or_else(|| DbError::not_found("Ingredient", req.ingredient_id.as_str()))?;

            let mut entry = new_entry(MovementType::RecipeUsed, req.required, now);
            entry.ingredient_id = Some(req.ingredient_id.clone());
            entry.recipe_id = Some(plan.recipe_id.clone());
            entry.notes = Some(note.clone());
            append(&mut tx, &entry).await?;

            consumed.push(Consumption {
                ingredient_id: req.ingredient_id.clone(),
                ingredient_name: req.ingredient_name.clone(),
                unit: req.unit.clone(),
                consumed: req.required,
                remaining,
            });
        }

        let linked: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT id, name FROM products
            WHERE recipe_id = ?1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(&plan.recipe_id)
        .fetch_optional(&mut *tx)
        .await?;

        let produced = match linked {
            Some((product_id, product_name)) => {
                let new_stock: i64 = sqlx::query_scalar(
                    r#"
                    UPDATE products SET
                        current_stock = current_stock + ?2,
                        updated_at = ?3
                    WHERE id = ?1
                    RETURNING current_stock
                    "#,
                )
                .bind(&product_id)
                .bind(plan.multiplier)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;

                let mut entry = new_entry(
                    MovementType::RecipeProduced,
                    Quantity::from_units(plan.multiplier),
                    now,
                );
                entry.product_id = Some(product_id.clone());
                entry.recipe_id = Some(plan.recipe_id.clone());
                entry.notes = Some(note.clone());
                append(&mut tx, &entry).await?;

                Some(ProducedStock {
                    product_id,
                    product_name,
                    new_stock,
                })
            }
            None => None,
        };

        tx.commit().await?;

        info!(
            recipe = %plan.recipe_name,
            multiplier = plan.multiplier,
            ingredients = consumed.len(),
            new_stock = produced.as_ref().map(|p| p.new_stock),
            "Recipe prepared"
        );

        Ok(PreparationOutcome {
            recipe_id: plan.recipe_id,
            recipe_name: plan.recipe_name,
            multiplier: plan.multiplier,
            consumed,
            produced,
        })
    }
}

async fn load_plan(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    multiplier: i64,
) -> DbResult<PreparationPlan> {
    let recipe = fetch_recipe(conn, recipe_id)
        .await?
        .ok_or_else(|| DbError::not_found("Recipe", recipe_id))?;
    let items = fetch_items(conn, recipe_id).await?;

    Ok(PreparationPlan::build(&recipe, &items, multiplier)?)
}

/// Takes `req.required` off the ingredient, only if that much is on hand.
///
/// A shortfall reports the quantity actually present at write time.
async fn deduct(
    conn: &mut SqliteConnection,
    req: &Requirement,
    now: DateTime<Utc>,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE ingredients SET
            current_quantity_milli = current_quantity_milli - ?2,
            updated_at = ?3
        WHERE id = ?1 AND current_quantity_milli >= ?2
        "#,
    )
    .bind(&req.ingredient_id)
    .bind(req.required.milli())
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        let available = current_quantity(conn, &req.ingredient_id)
            .await?
            .unwrap_or_else(Quantity::zero);
        return Err(CoreError::InsufficientIngredient {
            ingredient: req.ingredient_name.clone(),
            unit: req.unit.clone(),
            required: req.required,
            available,
        }
        .into());
    }

    Ok(())
}

async fn current_quantity(
    conn: &mut SqliteConnection,
    ingredient_id: &str,
) -> DbResult<Option<Quantity>> {
    let milli: Option<i64> =
        sqlx::query_scalar("SELECT current_quantity_milli FROM ingredients WHERE id = ?1")
            .bind(ingredient_id)
            .fetch_optional(conn)
            .await?;

    Ok(milli.map(Quantity::from_milli))
}
