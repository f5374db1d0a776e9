//! # Domain Types
//!
//! Core domain types used throughout the register.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────┐      ┌──────────────┐      ┌──────────────────┐      │
//! │  │   Category   │◄─────│   Product    │─────►│     Recipe       │      │
//! │  │  name        │ 0..1 │  price_cents │ 0..1 │  is_active       │      │
//! │  └──────────────┘      │  stock       │      └────────┬─────────┘      │
//! │                        └──────────────┘               │ 1..n           │
//! │                                                ┌──────▼─────────┐      │
//! │                                                │   RecipeItem   │      │
//! │                                                │  quantity_milli│      │
//! │                                                └──────┬─────────┘      │
//! │                                                       │                │
//! │  ┌──────────────┐      ┌──────────────┐      ┌────────▼─────────┐      │
//! │  │ CashSession  │◄─────│    Order     │      │   Ingredient     │      │
//! │  │  totals      │ 1    │  items (JSON)│      │  current_quantity│      │
//! │  └──────────────┘      └──────────────┘      └──────────────────┘      │
//! │                                                                         │
//! │  InventoryLog: append-only record of every stock movement               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Conventions
//! - `id`: UUID v4 string, generated in Rust before insert
//! - `*_cents`: money in integer cents, see [`Money`]
//! - `*_milli`: ingredient amounts in thousandths, see [`Quantity`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::validation::{
    validate_description, validate_name, validate_non_negative, validate_price_cents,
    validate_recipe_item_quantity, validate_unit,
};
use crate::{DEFAULT_INGREDIENT_UNIT, DEFAULT_MIN_STOCK};

// =============================================================================
// Category
// =============================================================================

/// A menu tab ("Drinks", "Mains", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// Something the register can sell.
///
/// A product is either **stocked** (bottled drinks, bought in) or **made from
/// a recipe** (cooked in batches, stock topped up by preparing the recipe).
/// The distinction only matters for the "can I still sell this" check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the menu button and receipt.
    pub name: String,

    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Menu tab; `None` lands in the "Other" tab.
    pub category_id: Option<String>,

    /// Recipe that produces this product, if it is cooked in-house.
    pub recipe_id: Option<String>,

    /// Units on hand.
    pub current_stock: i64,

    /// At or below this level the product shows a low-stock badge.
    pub min_stock: i64,

    /// Inactive products are hidden from the menu.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn has_recipe(&self) -> bool {
        self.recipe_id.is_some()
    }

    /// Stocked product with nothing left.
    ///
    /// Recipe products are never out of stock from the menu's point of view:
    /// the kitchen can always cook more.
    pub fn is_out_of_stock(&self) -> bool {
        !self.has_recipe() && self.current_stock <= 0
    }

    /// At or below the minimum, but not already out.
    pub fn is_low_stock(&self) -> bool {
        !self.is_out_of_stock() && self.current_stock <= self.min_stock
    }

    /// Checks whether `quantity` units may be put on an order.
    pub fn can_sell(&self, quantity: i64) -> bool {
        if !self.is_active {
            return false;
        }
        if self.has_recipe() {
            return true;
        }
        self.current_stock >= quantity
    }
}

/// A product joined with the names of its category and recipe.
///
/// Used by both the menu and the admin product table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductListing {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub product: Product,
    pub category_name: Option<String>,
    pub recipe_name: Option<String>,
}

// =============================================================================
// Ingredient
// =============================================================================

/// A raw material the kitchen consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Free text: "kg", "l", "unit", ...
    pub unit: String,
    pub current_quantity_milli: i64,
    pub min_quantity_milli: i64,
    /// Cost of one whole `unit`.
    pub cost_per_unit_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    #[inline]
    pub fn current_quantity(&self) -> Quantity {
        Quantity::from_milli(self.current_quantity_milli)
    }

    #[inline]
    pub fn min_quantity(&self) -> Quantity {
        Quantity::from_milli(self.min_quantity_milli)
    }

    pub fn is_low_stock(&self) -> bool {
        self.current_quantity() <= self.min_quantity()
    }

    /// Value of what is on hand, rounded to the cent.
    pub fn stock_value(&self) -> Money {
        Money::from_cents(self.cost_per_unit_cents).times_quantity(self.current_quantity())
    }
}

// =============================================================================
// Recipe
// =============================================================================

/// A preparation that turns ingredients into sellable units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// One ingredient line of a recipe, per single unit of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RecipeItem {
    pub id: String,
    pub recipe_id: String,
    pub ingredient_id: String,
    pub quantity_milli: i64,
}

/// A recipe line joined with its ingredient's name, unit and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RecipeItemDetail {
    pub id: String,
    pub recipe_id: String,
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub unit: String,
    pub quantity_milli: i64,
    /// The ingredient's current quantity at read time.
    pub available_milli: i64,
}

impl RecipeItemDetail {
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }

    #[inline]
    pub fn available(&self) -> Quantity {
        Quantity::from_milli(self.available_milli)
    }
}

// =============================================================================
// Cash Session
// =============================================================================

/// One shift of the cash register, from opening count to closing count.
///
/// Rules for opening, recording orders and closing live in
/// [`crate::session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashSession {
    pub id: String,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    /// `None` while the session is open.
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
    pub opening_balance_cents: i64,
    pub closing_balance_cents: Option<i64>,
    pub total_orders: i64,
    pub total_sales_cents: i64,
}

// =============================================================================
// Order
// =============================================================================

/// A line of an order.
///
/// Name and unit price are frozen when the product is first added, so a price
/// edit in the admin screen never changes an order in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl OrderLine {
    /// Creates a quantity-1 line from a product.
    pub fn from_product(product: &Product) -> Self {
        OrderLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: 1,
            unit_price_cents: product.price_cents,
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn checked_line_total(&self) -> Option<Money> {
        self.unit_price().checked_multiply_quantity(self.quantity)
    }
}

/// A checked-out order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub cash_session_id: String,
    /// Snapshot of the lines at checkout.
    pub items: Vec<OrderLine>,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Inventory Log
// =============================================================================

/// Why stock moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Ingredient consumed by a recipe preparation.
    RecipeUsed,
    /// Product units produced by a recipe preparation.
    RecipeProduced,
    /// Product units sold at checkout.
    Sale,
    /// Manual correction from the admin screen.
    Adjustment,
}

/// An append-only stock movement record.
///
/// `quantity_milli` is always in thousandths, for products too (one sold
/// unit is logged as 1000) so every row reads the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryLog {
    pub id: String,
    pub ingredient_id: Option<String>,
    pub product_id: Option<String>,
    pub movement_type: MovementType,
    pub quantity_milli: i64,
    pub recipe_id: Option<String>,
    pub order_id: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Admin Inputs
// =============================================================================
// Form payloads from the admin screens. `validate()` runs before anything
// touches the database.

/// Create/edit payload for a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: String,
    #[serde(default)]
    pub recipe_id: Option<String>,
    #[serde(default)]
    pub current_stock: i64,
    #[serde(default = "default_min_stock")]
    pub min_stock: i64,
}

fn default_min_stock() -> i64 {
    DEFAULT_MIN_STOCK
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("name", &self.name)?;
        validate_description(self.description.as_deref())?;
        validate_price_cents(self.price_cents)?;
        if self.category_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "category".to_string(),
            });
        }
        validate_non_negative("current stock", self.current_stock)?;
        validate_non_negative("minimum stock", self.min_stock)?;
        Ok(())
    }
}

/// Create payload for an ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IngredientInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to `kg` when blank.
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub current_quantity_milli: i64,
    #[serde(default)]
    pub min_quantity_milli: i64,
    #[serde(default)]
    pub cost_per_unit_cents: i64,
}

impl IngredientInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("name", &self.name)?;
        validate_description(self.description.as_deref())?;
        validate_unit(&self.unit_or_default())?;
        validate_non_negative("current quantity", self.current_quantity_milli)?;
        validate_non_negative("minimum quantity", self.min_quantity_milli)?;
        validate_price_cents(self.cost_per_unit_cents)?;
        Ok(())
    }

    pub fn unit_or_default(&self) -> String {
        match self.unit.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => DEFAULT_INGREDIENT_UNIT.to_string(),
        }
    }
}

/// One line of a recipe form. Blank rows arrive with no ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipeItemInput {
    #[serde(default)]
    pub ingredient_id: Option<String>,
    pub quantity_milli: i64,
}

/// Create payload for a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipeInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: i64,
    pub items: Vec<RecipeItemInput>,
}

impl RecipeInput {
    /// Lines that name an ingredient, as `(ingredient_id, quantity)`.
    pub fn filled_items(&self) -> Vec<(String, Quantity)> {
        self.items
            .iter()
            .filter_map(|item| match item.ingredient_id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => {
                    Some((id.to_string(), Quantity::from_milli(item.quantity_milli)))
                }
                _ => None,
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("name", &self.name)?;
        validate_description(self.description.as_deref())?;
        validate_price_cents(self.price_cents)?;

        let items = self.filled_items();
        if items.is_empty() {
            return Err(ValidationError::Required {
                field: "ingredients".to_string(),
            });
        }
        for (_, quantity) in &items {
            validate_recipe_item_quantity(*quantity)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
