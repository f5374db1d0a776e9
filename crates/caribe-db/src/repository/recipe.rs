//! # Recipe Repository
//!
//! Recipes and their ingredient lines. A recipe is written together with its
//! lines in one transaction; deleting it cascades to the lines and unlinks
//! any product that pointed at it.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use caribe_core::{Recipe, RecipeInput, RecipeItemDetail};

use super::generate_id;
use crate::error::{DbError, DbResult};

/// Repository for recipe database operations.
#[derive(Debug, Clone)]
pub struct RecipeRepository {
    pool: SqlitePool,
}

impl RecipeRepository {
    /// Creates a new RecipeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecipeRepository { pool }
    }

    /// Lists recipes by name.
    pub async fn list(&self, active_only: bool) -> DbResult<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, description, price_cents, is_active, created_at
            FROM recipes
            WHERE (?1 = 0 OR is_active = 1)
            ORDER BY name
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    /// Gets a recipe by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Recipe>> {
        let mut conn = self.pool.acquire().await?;
        fetch_recipe(&mut conn, id).await
    }

    /// Recipe lines with ingredient name, unit and current quantity.
    pub async fn items(&self, recipe_id: &str) -> DbResult<Vec<RecipeItemDetail>> {
        let mut conn = self.pool.acquire().await?;
        fetch_items(&mut conn, recipe_id).await
    }

    /// Creates a recipe with its lines.
    ///
    /// Lines without an ingredient are dropped; at least one must remain.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - A line names an unknown ingredient
    pub async fn create(&self, input: &RecipeInput) -> DbResult<Recipe> {
        input.validate()?;
        let recipe = Recipe {
            id: generate_id(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            price_cents: input.price_cents,
            is_active: true,
            created_at: Utc::now(),
        };
        let lines = input.filled_items();

        debug!(name = %recipe.name, lines = lines.len(), "Inserting recipe");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO recipes (id, name, description, price_cents, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&recipe.id)
        .bind(&recipe.name)
        .bind(&recipe.description)
        .bind(recipe.price_cents)
        .bind(recipe.is_active)
        .bind(recipe.created_at)
        .execute(&mut *tx)
        .await?;

        for (ingredient_id, quantity) in &lines {
            sqlx::query(
                r#"
                INSERT INTO recipe_items (id, recipe_id, ingredient_id, quantity_milli)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(generate_id())
            .bind(&recipe.id)
            .bind(ingredient_id)
            .bind(quantity.milli())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(recipe)
    }

    /// Activates or deactivates a recipe. Inactive recipes cannot be prepared.
    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        debug!(id = %id, is_active, "Toggling recipe");

        let result = sqlx::query("UPDATE recipes SET is_active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Recipe", id));
        }

        Ok(())
    }

    /// Deletes a recipe and its lines.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting recipe");

        let result = sqlx::query("DELETE FROM recipes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Recipe", id));
        }

        Ok(())
    }
}

// =============================================================================
// Shared Reads
// =============================================================================
// Also used by the preparation workflow on its own transaction.

pub(crate) async fn fetch_recipe(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, name, description, price_cents, is_active, created_at
        FROM recipes
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(recipe)
}

pub(crate) async fn fetch_items(
    conn: &mut SqliteConnection,
    recipe_id: &str,
) -> DbResult<Vec<RecipeItemDetail>> {
    let items = sqlx::query_as::<_, RecipeItemDetail>(
        r#"
        SELECT
            ri.id, ri.recipe_id, ri.ingredient_id,
            i.name AS ingredient_name,
            i.unit,
            ri.quantity_milli,
            i.current_quantity_milli AS available_milli
        FROM recipe_items ri
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = ?1
        ORDER BY i.name
        "#,
    )
    .bind(recipe_id)
    .fetch_all(conn)
    .await?;

    Ok(items)
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use caribe_core::{IngredientInput, RecipeItemInput};

    use super::*;

    async fn ingredient(db: &Database, name: &str) -> String {
        db.ingredients()
            .create(&IngredientInput {
                name: name.to_string(),
                description: None,
                unit: Some("lb".to_string()),
                current_quantity_milli: 10_000,
                min_quantity_milli: 0,
                cost_per_unit_cents: 0,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_drops_blank_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let rice = ingredient(&db, "Arroz").await;
        let chicken = ingredient(&db, "Pollo").await;

        let recipe = db
            .recipes()
            .create(&RecipeInput {
                name: "Arroz con pollo".to_string(),
                description: None,
                price_cents: 1_200,
                items: vec![
                    RecipeItemInput { ingredient_id: Some(rice), quantity_milli: 250 },
                    RecipeItemInput { ingredient_id: None, quantity_milli: 999 },
                    RecipeItemInput { ingredient_id: Some(chicken), quantity_milli: 300 },
                ],
            })
            .await
            .unwrap();

        let items = db.recipes().items(&recipe.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].ingredient_name, "Arroz");
        assert_eq!(items[0].unit, "lb");
        assert_eq!(items[0].available_milli, 10_000);
        assert_eq!(items[1].quantity_milli, 300);
    }

    #[tokio::test]
    async fn test_unknown_ingredient_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let result = db
            .recipes()
            .create(&RecipeInput {
                name: "Tostones".to_string(),
                description: None,
                price_cents: 500,
                items: vec![RecipeItemInput {
                    ingredient_id: Some("missing".to_string()),
                    quantity_milli: 100,
                }],
            })
            .await;

        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
        assert!(db.recipes().list(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let rice = ingredient(&db, "Arroz").await;
        let recipe = db
            .recipes()
            .create(&RecipeInput {
                name: "Arroz blanco".to_string(),
                description: None,
                price_cents: 300,
                items: vec![RecipeItemInput { ingredient_id: Some(rice.clone()), quantity_milli: 200 }],
            })
            .await
            .unwrap();

        db.recipes().set_active(&recipe.id, false).await.unwrap();
        assert!(db.recipes().list(true).await.unwrap().is_empty());
        assert_eq!(db.recipes().list(false).await.unwrap().len(), 1);

        // Still referenced by a recipe line
        assert!(matches!(
            db.ingredients().delete(&rice).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));

        db.recipes().delete(&recipe.id).await.unwrap();
        assert!(db.recipes().items(&recipe.id).await.unwrap().is_empty());
        db.ingredients().delete(&rice).await.unwrap();
    }
}
