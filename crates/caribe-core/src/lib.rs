//! # caribe-core: Pure Business Logic for Parada Caribe
//!
//! This crate is the **heart** of the register. It contains the restaurant's
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Parada Caribe Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Renderer (external)                          │   │
//! │  │    Menu tabs ──► Order panel ──► Checkout ──► Receipt print    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON lines (stdin/stdout)              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Register Commands                            │   │
//! │  │    get_catalog, add_to_order, checkout, prepare_recipe, ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caribe-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  money   │ │  order   │ │ session  │ │  recipe  │          │   │
//! │  │   │ quantity │ │ catalog  │ │ document │ │inventory │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    caribe-db (Database Layer)                   │   │
//! │  │       SQLite, migrations, atomic checkout and preparation       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Product, Ingredient, Recipe, CashSession, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`quantity`] - Ingredient quantities in thousandths of a unit
//! - [`catalog`] - Grouping products into menu tabs with stock badges
//! - [`order`] - The in-progress order (line items, totals)
//! - [`session`] - Cash register session rules
//! - [`recipe`] - Recipe preparation planning
//! - [`inventory`] - Inventory dashboard figures
//! - [`document`] - Receipt and session summary documents
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use caribe_core::money::Money;
//! use caribe_core::quantity::Quantity;
//!
//! // Ingredients cost per whole unit; stock is tracked in thousandths
//! let cost_per_kg = Money::from_cents(450); // $4.50 / kg
//! let on_hand = Quantity::from_milli(2_500); // 2.5 kg
//!
//! assert_eq!(cost_per_kg.times_quantity(on_hand).cents(), 1125);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod document;
pub mod error;
pub mod inventory;
pub mod money;
pub mod order;
pub mod quantity;
pub mod recipe;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use caribe_core::Money` instead of
// `use caribe_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use quantity::Quantity;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single order.
///
/// ## Business Reason
/// A single table never orders more than a few dozen dishes; anything beyond
/// this is a runaway click loop on the touch screen.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line in an order.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Highest menu price, in cents ($1,000,000).
///
/// Keeps price × quantity × lines far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum batch multiplier for one recipe preparation.
pub const MAX_PREPARATION_MULTIPLIER: i64 = 1_000;

/// Minimum stock used when a product is created without one.
pub const DEFAULT_MIN_STOCK: i64 = 10;

/// Unit used when an ingredient is created without one.
pub const DEFAULT_INGREDIENT_UNIT: &str = "kg";

/// Menu tab for products that have no category.
pub const UNCATEGORIZED: &str = "Other";
