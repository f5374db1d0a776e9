//! # caribe-db: Database Layer for Parada Caribe POS
//!
//! SQLite storage for the register, through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Parada Caribe Data Flow                            │
//! │                                                                         │
//! │  Register command (checkout, prepare_recipe, ...)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    caribe-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐   ┌─────────────────┐   ┌──────────────┐    │    │
//! │  │   │   Database    │   │  Repositories   │   │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │   │                 │   │  (embedded)  │    │    │
//! │  │   │               │   │ Category Product│   │              │    │    │
//! │  │   │ SqlitePool    │◄──│ Ingredient      │   │ 0001_initial │    │    │
//! │  │   │ WAL + FKs     │   │ Recipe Order    │   │ _schema.sql  │    │    │
//! │  │   │               │   │ CashSession     │   │              │    │    │
//! │  │   │               │   │ Preparation Log │   │              │    │    │
//! │  │   └───────────────┘   └─────────────────┘   └──────────────┘    │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  SQLite file ($CARIBE_DB_PATH)                  │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table, plus the preparation workflow
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caribe_db::{Database, DbConfig};
//! use caribe_core::Money;
//!
//! let db = Database::new(DbConfig::new("caribe.db")).await?;
//!
//! let session = db.cash_sessions().open(Money::from_cents(10_000)).await?;
//! let order = db.orders().place_order(&session.id, &lines).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cash_session::CashSessionRepository;
pub use repository::category::CategoryRepository;
pub use repository::ingredient::IngredientRepository;
pub use repository::inventory_log::InventoryLogRepository;
pub use repository::order::OrderRepository;
pub use repository::preparation::PreparationRepository;
pub use repository::product::ProductRepository;
pub use repository::recipe::RecipeRepository;
