//! # Store Database Errors
//!
//! Classification of PostgreSQL failures into something the HTTP layer
//! and AddProductToOrder can act on.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  PostgreSQL Error (sqlx::Error)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├──────────────────────────┐                                      │
//! │       ▼                          ▼                                      │
//! │  ApiError (CRUD routes)     CoreError (AddProductToOrder)               │
//! │                              NotFound | InsufficientStock |             │
//! │                              Validation | Storage                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use store_core::{CoreError, ValidationError};
use thiserror::Error;

/// Failure of a repository call.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row for the requested id.
    ///
    /// ## When This Occurs
    /// - `fetch_optional` returns no row for a required entity
    /// - UPDATE/DELETE affects zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (e.g. duplicate category slug).
    #[error("Duplicate value violates {constraint}")]
    UniqueViolation { constraint: String },

    /// Insert or update points at a row that does not exist.
    ///
    /// ## When This Occurs
    /// - Creating an order for an unknown customer_id
    /// - Category parent_id that does not exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Delete of a row other rows still point at.
    ///
    /// ## When This Occurs
    /// - Deleting a customer that has orders
    /// - Deleting a product that appears on an order line
    #[error("Row is still referenced: {message}")]
    StillReferenced { message: String },

    /// CHECK constraint violation (negative stock, non-positive line quantity).
    #[error("Check constraint violated: {message}")]
    CheckViolation { message: String },

    /// Stock lower than the requested quantity.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Input rejected before or during a write.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// PostgreSQL unreachable, or the pool was closed during shutdown.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other SQLSTATE, e.g. `40P01` deadlock or a syntax error.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection freed up within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Decode errors and other driver-side surprises.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// `NotFound` for `entity` with the id rendered as text.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Classifies an `sqlx::Error`.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → SQLSTATE class 23 helpers:
///                                 unique      → UniqueViolation
///                                 foreign key → ForeignKeyViolation / StillReferenced
///                                 check       → CheckViolation
///                                 other       → QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();

                if db_err.is_unique_violation() {
                    DbError::UniqueViolation {
                        constraint: db_err.constraint().unwrap_or("unique constraint").to_string(),
                    }
                } else if db_err.is_foreign_key_violation() {
                    // PostgreSQL phrases the delete side as
                    // "update or delete on table ... violates foreign key constraint"
                    if msg.starts_with("update or delete on table") {
                        DbError::StillReferenced { message: msg }
                    } else {
                        DbError::ForeignKeyViolation { message: msg }
                    }
                } else if db_err.is_check_violation() {
                    DbError::CheckViolation { message: msg }
                } else {
                    DbError::QueryFailed(msg)
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Lets AddProductToOrder use `?` on the pure planning step.
impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => DbError::NotFound { entity, id },
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => DbError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            CoreError::Validation(e) => DbError::Validation(e),
            CoreError::Storage(msg) => DbError::Internal(msg),
        }
    }
}

/// Collapses database detail into the four AddProductToOrder outcomes.
impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            DbError::InsufficientStock {
                product_id,
                available,
                requested,
            } => CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            DbError::Validation(e) => CoreError::Validation(e),
            other => CoreError::Storage(other.to_string()),
        }
    }
}

/// Result of a repository call.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_pool_errors() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));

        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[test]
    fn test_storage_detail_collapses_to_opaque_core_error() {
        let core: CoreError = DbError::QueryFailed("deadlock detected".to_string()).into();
        assert!(matches!(core, CoreError::Storage(_)));

        let core: CoreError = DbError::PoolExhausted.into();
        assert!(matches!(core, CoreError::Storage(_)));
    }

    #[test]
    fn test_engine_outcomes_survive_round_trip() {
        let core: CoreError = DbError::not_found("Order", "o-1").into();
        assert!(matches!(core, CoreError::NotFound { ref entity, .. } if entity == "Order"));

        let db: DbError = CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 3,
            requested: 5,
        }
        .into();
        let core: CoreError = db.into();
        assert!(matches!(
            core,
            CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            }
        ));
    }
}
