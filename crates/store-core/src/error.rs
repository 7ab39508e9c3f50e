//! # Error Types
//!
//! Domain-specific error types for store-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  store-core errors (this file)                                         │
//! │  ├── CoreError        - Outcome of AddProductToOrder                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  store-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  store-api errors (in app)                                             │
//! │  └── ApiError         - JSON body + HTTP status                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ◄── DbError → ApiError → Client      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `CoreError` has exactly four kinds. Storage failures arrive as an opaque
//! `Storage` message so callers never branch on driver details.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Failures of adding a product to an order.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The order or the product does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Product stock is lower than the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /orders/{id}/items { quantity: 5 }
    ///      │
    ///      ▼
    /// Lock product row: stock=3
    ///      │
    ///      ▼
    /// InsufficientStock { available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// 400 "not enough stock for product ..."
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Opaque storage failure. The message is for server-side logs only.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl CoreError {
    /// `NotFound` for `entity` ("Order", "Product") with the id as given.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Rejected input.
///
/// Raised before any database work starts, and rendered as 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Empty after trimming.
    #[error("{field} is required")]
    Required { field: String },

    /// Longer than the column allows.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Outside `[min, max]`, e.g. negative stock or a line quantity past `i32::MAX`.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// A money amount past what the price and total columns can hold.
    #[error("{field} must be at most {max}")]
    AmountTooLarge { field: String, max: String },

    /// Zero or negative where only `> 0` makes sense (quantity added to an order).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, too many decimal places).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result of an AddProductToOrder step.
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
            product_id: "p-1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product p-1: available 3, requested 5"
        );

        let err = CoreError::not_found("Order", 42);
        assert_eq!(err.to_string(), "Order not found: 42");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
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
