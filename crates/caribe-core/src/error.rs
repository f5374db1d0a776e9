//! # Error Types
//!
//! Domain-specific error types for caribe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caribe-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  caribe-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Register API errors (in app)                                          │
//! │  └── ApiError         - What the renderer sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Renderer     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, ingredient, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::quantity::Quantity;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are raised either by
/// pure code in this crate or by the database layer when a rule has to be
/// re-checked inside a transaction.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be ordered at all.
    ///
    /// ## When This Occurs
    /// - Product is not made from a recipe and has no stock left
    /// - Product was deactivated from the admin screen
    #[error("{product}: stock unavailable")]
    ProductUnavailable { product: String },

    /// Ordering more units than are on the shelf.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "Malta" (3rd time)
    ///      │
    ///      ▼
    /// Check stock: available=2
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Malta", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// Renderer shows: "Only 2 Malta in stock"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// An ingredient cannot cover a recipe preparation.
    #[error("Insufficient {ingredient}: required {required} {unit}, available {available} {unit}")]
    InsufficientIngredient {
        ingredient: String,
        unit: String,
        required: Quantity,
        available: Quantity,
    },

    /// The product is not part of the current order.
    #[error("Product {0} is not in the order")]
    NotInOrder(String),

    /// Order has exceeded maximum allowed lines.
    #[error("Order cannot have more than {max} lines")]
    OrderTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A line or order total no longer fits in the money type.
    #[error("Order amount for {product} is too large")]
    AmountTooLarge { product: String },

    /// Checkout was attempted with nothing in the order.
    #[error("Order is empty")]
    EmptyOrder,

    /// A cash session is already open.
    #[error("A cash session is already open")]
    SessionAlreadyOpen,

    /// There is no open cash session to act on.
    #[error("No cash session is open")]
    NoOpenSession,

    /// The session was closed before the operation could complete.
    #[error("Cash session is closed")]
    SessionClosed,

    /// Recipe is switched off and cannot be prepared.
    #[error("Recipe {0} is inactive")]
    RecipeInactive(String),

    /// Recipe has no ingredient lines.
    #[error("Recipe {0} has no ingredients")]
    RecipeHasNoItems(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, malformed decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Malta".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Malta: available 2, requested 3"
        );

        let err = CoreError::ProductUnavailable {
            product: "Coco Frio".to_string(),
        };
        assert_eq!(err.to_string(), "Coco Frio: stock unavailable");
    }

    #[test]
    fn test_insufficient_ingredient_message() {
        let err = CoreError::InsufficientIngredient {
            ingredient: "Rice".to_string(),
            unit: "kg".to_string(),
            required: Quantity::from_milli(2_000),
            available: Quantity::from_milli(1_250),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient Rice: required 2 kg, available 1.25 kg"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Negative {
            field: "opening balance".to_string(),
        };
        assert_eq!(err.to_string(), "opening balance cannot be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
