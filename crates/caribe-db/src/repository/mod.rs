//! # Repository Module
//!
//! Database repository implementations for the register.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Register command                                                       │
//! │       │                                                                 │
//! │       │  db.recipes().items(&recipe_id)                                 │
//! │       ▼                                                                 │
//! │  RecipeRepository                                                       │
//! │  ├── list(&self, active_only)                                           │
//! │  ├── items(&self, recipe_id)                                            │
//! │  ├── create(&self, input)                                               │
//! │  └── delete(&self, id)                                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Multi-table workflows (checkout, recipe preparation, ingredient        │
//! │  adjustment) run every statement on one transaction and commit once.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`category::CategoryRepository`] - Menu tabs
//! - [`product::ProductRepository`] - Sellable products, menu listing
//! - [`ingredient::IngredientRepository`] - Pantry, adjustments, dashboard
//! - [`recipe::RecipeRepository`] - Recipes and their ingredient lines
//! - [`cash_session::CashSessionRepository`] - Open/close the register
//! - [`order::OrderRepository`] - Atomic checkout, order history
//! - [`preparation::PreparationRepository`] - Atomic recipe preparation
//! - [`inventory_log::InventoryLogRepository`] - Stock movement history

pub mod cash_session;
pub mod category;
pub mod ingredient;
pub mod inventory_log;
pub mod order;
pub mod preparation;
pub mod product;
pub mod recipe;

/// Generates a new entity ID.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
