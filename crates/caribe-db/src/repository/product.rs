//! # Product Repository
//!
//! Database operations for sellable products.
//!
//! ## Menu Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products p                                                             │
//! │    LEFT JOIN categories c  → category_name (NULL → "Other" tab)         │
//! │    LEFT JOIN recipes r     → recipe_name                                │
//! │                                                                         │
//! │  ORDER BY c.name IS NULL, c.name, p.name                                │
//! │           └── uncategorized last                                        │
//! │                                                                         │
//! │  Result rows are ProductListing { product, category_name, recipe_name } │
//! │  and feed Catalog::build for the menu or the admin table as-is.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is decremented at checkout by [`OrderRepository`] and incremented
//! by recipe preparation; this repository only sets it from the admin form.
//!
//! [`OrderRepository`]: crate::repository::order::OrderRepository

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use caribe_core::validation::validate_search_query;
use caribe_core::{Product, ProductInput, ProductListing};

use super::generate_id;
use crate::error::{DbError, DbResult};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Menu listing, active products only
/// let listings = repo.list_with_names(true).await?;
///
/// // Get by ID
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products with their category and recipe names.
    ///
    /// ## Arguments
    /// * `active_only` - `true` for the menu, `false` for the admin table
    pub async fn list_with_names(&self, active_only: bool) -> DbResult<Vec<ProductListing>> {
        debug!(active_only, "Listing products");

        let listings = sqlx::query_as::<_, ProductListing>(
            r#"
            SELECT
                p.id, p.name, p.description, p.price_cents, p.category_id, p.recipe_id,
                p.current_stock, p.min_stock, p.is_active, p.created_at, p.updated_at,
                c.name AS category_name,
                r.name AS recipe_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN recipes r ON r.id = p.recipe_id
            WHERE (?1 = 0 OR p.is_active = 1)
            ORDER BY c.name IS NULL, c.name, p.name
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = listings.len(), "Listed products");
        Ok(listings)
    }

    /// Case-insensitive search on product name.
    ///
    /// An empty query returns every product, like [`list_with_names`].
    ///
    /// [`list_with_names`]: Self::list_with_names
    pub async fn search(&self, query: &str) -> DbResult<Vec<ProductListing>> {
        let query = validate_search_query(query)?;
        if query.is_empty() {
            return self.list_with_names(false).await;
        }

        debug!(query = %query, "Searching products");

        let pattern = format!("%{}%", query.to_lowercase());
        let listings = sqlx::query_as::<_, ProductListing>(
            r#"
            SELECT
                p.id, p.name, p.description, p.price_cents, p.category_id, p.recipe_id,
                p.current_stock, p.min_stock, p.is_active, p.created_at, p.updated_at,
                c.name AS category_name,
                r.name AS recipe_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN recipes r ON r.id = p.recipe_id
            WHERE LOWER(p.name) LIKE ?1
            ORDER BY p.name
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, description, price_cents, category_id, recipe_id,
                current_stock, min_stock, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Creates a product from the admin form.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Category or recipe doesn't exist
    pub async fn create(&self, input: &ProductInput) -> DbResult<Product> {
        input.validate()?;
        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            price_cents: input.price_cents,
            category_id: Some(input.category_id.clone()),
            recipe_id: input.recipe_id.clone(),
            current_stock: input.current_stock,
            min_stock: input.min_stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, category_id, recipe_id,
                current_stock, min_stock, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.category_id)
        .bind(&product.recipe_id)
        .bind(product.current_stock)
        .bind(product.min_stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Replaces a product's editable fields.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, input: &ProductInput) -> DbResult<Product> {
        input.validate()?;
        debug!(id = %id, "Updating product");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                category_id = ?5,
                recipe_id = ?6,
                current_stock = ?7,
                min_stock = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.category_id)
        .bind(&input.recipe_id)
        .bind(input.current_stock)
        .bind(input.min_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Shows or hides a product on the menu.
    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        debug!(id = %id, is_active, "Toggling product");

        let result = sqlx::query("UPDATE products SET is_active = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(is_active)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Past orders keep their item snapshot; log entries lose the reference.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use caribe_core::UNCATEGORIZED;

    use super::*;

    fn input(name: &str, category_id: &str, stock: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: None,
            price_cents: 250,
            category_id: category_id.to_string(),
            recipe_id: None,
            current_stock: stock,
            min_stock: 10,
        }
    }

    #[tokio::test]
    async fn test_listing_joins_names_and_orders_by_category() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mains = db.categories().create("Mains").await.unwrap();
        let drinks = db.categories().create("Drinks").await.unwrap();

        db.products().create(&input("Mofongo", &mains.id, 5)).await.unwrap();
        db.products().create(&input("Malta", &drinks.id, 5)).await.unwrap();
        db.products().create(&input("Coco", &drinks.id, 5)).await.unwrap();
        let orphan = db.products().create(&input("Agua", &mains.id, 5)).await.unwrap();
        db.categories().delete(&mains.id).await.unwrap();

        let listings = db.products().list_with_names(true).await.unwrap();
        let order: Vec<_> = listings.iter().map(|l| l.product.name.as_str()).collect();
        // Deleting "Mains" moved its products to the uncategorized tail
        assert_eq!(order, vec!["Coco", "Malta", "Agua", "Mofongo"]);
        assert_eq!(listings[0].category_name.as_deref(), Some("Drinks"));

        let catalog = caribe_core::catalog::Catalog::build(listings);
        assert_eq!(catalog.group(UNCATEGORIZED).unwrap().items.len(), 2);
        assert!(db.products().get_by_id(&orphan.id).await.unwrap().unwrap().category_id.is_none());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let drinks = db.categories().create("Drinks").await.unwrap();
        db.products().create(&input("Jugo de Parcha", &drinks.id, 5)).await.unwrap();
        db.products().create(&input("Malta", &drinks.id, 5)).await.unwrap();

        let found = db.products().search("PARCHA").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(db.products().search("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_toggle_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let drinks = db.categories().create("Drinks").await.unwrap();
        let malta = db.products().create(&input("Malta", &drinks.id, 5)).await.unwrap();
        assert_eq!(malta.min_stock, 10);

        let mut edit = input("Malta Goya", &drinks.id, 24);
        edit.price_cents = 300;
        let updated = db.products().update(&malta.id, &edit).await.unwrap();
        assert_eq!(updated.name, "Malta Goya");
        assert_eq!(updated.current_stock, 24);

        db.products().set_active(&malta.id, false).await.unwrap();
        assert!(db.products().list_with_names(true).await.unwrap().is_empty());
        assert_eq!(db.products().list_with_names(false).await.unwrap().len(), 1);

        db.products().delete(&malta.id).await.unwrap();
        assert!(db.products().get_by_id(&malta.id).await.unwrap().is_none());
        assert!(matches!(
            db.products().update(&malta.id, &edit).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(matches!(
            db.products().create(&input("Malta", "no-such-category", 1)).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));
    }
}
