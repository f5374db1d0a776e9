//! # Validation Module
//!
//! Input validation utilities for the register.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Renderer                                                     │
//! │  ├── Required fields, numeric inputs                                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register command (Rust)                                      │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (category name, one open session)              │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caribe_core::validation::{validate_multiplier, validate_name};
//!
//! assert!(validate_name("name", "Tostones").is_ok());
//! assert!(validate_multiplier(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::quantity::Quantity;
use crate::{MAX_ORDER_LINES, MAX_PREPARATION_MULTIPLIER, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name for anything (product, ingredient, category, recipe).
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted free-text description.
pub const MAX_DESCRIPTION_LEN: usize = 1_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use caribe_core::validation::validate_name;
///
/// assert!(validate_name("name", "Pastelito de carne").is_ok());
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional description.
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates an ingredient unit ("kg", "l", "unit").
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    let unit = unit.trim();
    if unit.is_empty() {
        return Err(ValidationError::Required {
            field: "unit".to_string(),
        });
    }
    if unit.chars().count() > 20 {
        return Err(ValidationError::TooLong {
            field: "unit".to_string(),
            max: 20,
        });
    }
    Ok(())
}

/// Validates a name search query.
///
/// ## Returns
/// The trimmed query string. Empty means "no filter".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents. Zero is allowed (staff meals, free sides).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a cash count entered at session open or close.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Open Cash dialog                                                       │
/// │                                                                         │
/// │  Cashier counts the drawer: 150.00                                      │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_balance_cents(15000) ← THIS FUNCTION                          │
/// │       │                                                                 │
/// │       ├── < 0? → Error: "opening balance cannot be negative"            │
/// │       │                                                                 │
/// │       └── OK → open_cash                                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_balance_cents(field: &str, cents: i64) -> ValidationResult<()> {
    validate_non_negative(field, cents)
}

/// Validates that a stock figure is zero or more.
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the per-unit quantity of a recipe line.
pub fn validate_recipe_item_quantity(quantity: Quantity) -> ValidationResult<()> {
    if !quantity.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "ingredient quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a recipe preparation multiplier.
pub fn validate_multiplier(multiplier: i64) -> ValidationResult<()> {
    if multiplier < 1 || multiplier > MAX_PREPARATION_MULTIPLIER {
        return Err(ValidationError::OutOfRange {
            field: "multiplier".to_string(),
            min: 1,
            max: MAX_PREPARATION_MULTIPLIER,
        });
    }
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits on the order.
pub fn validate_order_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "order lines".to_string(),
            min: 0,
            max: MAX_ORDER_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
