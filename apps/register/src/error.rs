//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Parada Caribe                          │
//! │                                                                         │
//! │  Renderer                      Register process                         │
//! │  ────────                      ────────────────                         │
//! │                                                                         │
//! │  {"command":"checkout"}                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  Command Function                                                │   │
//! │  │  Result<T, ApiError>                                             │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐             │   │
//! │  │         │                                          │             │   │
//! │  │         ▼                                          ▼             │   │
//! │  │  Business rule? ─── CoreError::SessionClosed ───► ApiError ────► │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Success ──────────────────────────────────────────────────────► │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  {"ok":false,"error":{"code":"SESSION_CLOSED",                          │
//! │                       "message":"Cash session is closed"}}              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal failures are logged with their detail and reported with a
//! generic message.

use caribe_core::CoreError;
use caribe_db::DbError;
use serde::Serialize;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_INGREDIENT",
///   "message": "Insufficient Pollo: required 0.6 kg, available 0.4 kg"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Name already taken
    Duplicate,

    /// Reference to a missing row, or a row still in use
    InvalidReference,

    /// Database operation failed
    DatabaseError,

    /// Internal error
    Internal,

    /// Order builder rejected the change
    OrderError,

    /// Product cannot be sold in that quantity
    InsufficientStock,

    /// Ingredient cannot cover a preparation
    InsufficientIngredient,

    /// Recipe cannot be prepared as-is
    RecipeUnavailable,

    /// A session is already open
    SessionAlreadyOpen,

    /// No session is open
    NoOpenSession,

    /// Session closed; order entry and checkout are blocked
    SessionClosed,

    /// Request line could not be understood
    InvalidRequest,

    /// No such command
    UnknownCommand,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates an error for a malformed request.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => ApiError::from(core),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Duplicate,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::new(
                    ErrorCode::InvalidReference,
                    "Invalid reference, or the record is still in use",
                )
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored data could not be decoded: {}", e);
                ApiError::internal("Stored data could not be read")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductUnavailable { .. } | CoreError::InsufficientStock { .. } => {
                ErrorCode::InsufficientStock
            }
            CoreError::InsufficientIngredient { .. } => ErrorCode::InsufficientIngredient,
            CoreError::NotInOrder(_)
            | CoreError::OrderTooLarge { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::AmountTooLarge { .. }
            | CoreError::EmptyOrder => ErrorCode::OrderError,
            CoreError::SessionAlreadyOpen => ErrorCode::SessionAlreadyOpen,
            CoreError::NoOpenSession => ErrorCode::NoOpenSession,
            CoreError::SessionClosed => ErrorCode::SessionClosed,
            CoreError::RecipeInactive(_) | CoreError::RecipeHasNoItems(_) => {
                ErrorCode::RecipeUnavailable
            }
            CoreError::Validation(e) => return ApiError::validation(e.to_string()),
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_request(format!("Invalid arguments: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use caribe_core::{Quantity, ValidationError};

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::from(CoreError::SessionClosed);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "SESSION_CLOSED");
        assert_eq!(json["message"], "Cash session is closed");
    }

    #[test]
    fn test_domain_errors_pass_through_db_layer() {
        let err = ApiError::from(DbError::Domain(CoreError::InsufficientIngredient {
            ingredient: "Pollo".to_string(),
            unit: "kg".to_string(),
            required: Quantity::from_milli(600),
            available: Quantity::from_milli(400),
        }));
        assert_eq!(err.code, ErrorCode::InsufficientIngredient);
        assert_eq!(err.message, "Insufficient Pollo: required 0.6 kg, available 0.4 kg");
    }

    #[test]
    fn test_validation_message() {
        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "name".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = ApiError::from(DbError::QueryFailed("no such column: secret".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("secret"));
    }
}
