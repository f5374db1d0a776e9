//! # Category Repository
//!
//! Menu tabs. Deleting a category does not delete its products; they move to
//! the "Other" tab (`category_id` is set to NULL by the foreign key).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use caribe_core::validation::validate_name;
use caribe_core::Category;

use super::generate_id;
use crate::error::{DbError, DbResult};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Creates a category.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - A category with that name exists
    pub async fn create(&self, name: &str) -> DbResult<Category> {
        validate_name("category name", name)?;
        let category = Category {
            id: generate_id(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };

        debug!(name = %category.name, "Inserting category");

        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| duplicate_name(e, &category.name))?;

        Ok(category)
    }

    /// Renames a category.
    pub async fn rename(&self, id: &str, name: &str) -> DbResult<Category> {
        validate_name("category name", name)?;
        let name = name.trim();

        debug!(id = %id, name = %name, "Renaming category");

        let result = sqlx::query("UPDATE categories SET name = ?2 WHERE id = ?1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| duplicate_name(e, name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Counts categories (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Puts the offending name on a unique violation.
fn duplicate_name(err: sqlx::Error, name: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("category name", name),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    use super::*;

    #[tokio::test]
    async fn test_create_list_rename_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let mains = repo.create("Mains").await.unwrap();
        repo.create("Drinks").await.unwrap();

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Drinks", "Mains"]);

        let renamed = repo.rename(&mains.id, "Platos fuertes").await.unwrap();
        assert_eq!(renamed.name, "Platos fuertes");

        repo.delete(&mains.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(matches!(
            repo.delete(&mains.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.create("Drinks").await.unwrap();
        match repo.create("Drinks").await {
            Err(DbError::UniqueViolation { value, .. }) => assert_eq!(value, "Drinks"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(matches!(
            db.categories().create("  ").await,
            Err(DbError::Domain(_))
        ));
    }
}
