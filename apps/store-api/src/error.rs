//! Error types for the Store API.
//!
//! Every handler returns `Result<_, ApiError>`. The error renders as
//!
//! ```text
//! HTTP 404
//! {"code": "NOT_FOUND", "error": "Order not found: 7f0c..."}
//! ```
//!
//! ## Status Mapping
//! ```text
//! ┌──────────────────────┬────────┬────────────────────────────────────────┐
//! │ code                 │ status │ from                                   │
//! ├──────────────────────┼────────┼────────────────────────────────────────┤
//! │ NOT_FOUND            │ 404    │ DbError/CoreError::NotFound            │
//! │ VALIDATION_ERROR     │ 400    │ ValidationError, bad JSON, bad id,     │
//! │                      │        │ foreign key / check violations         │
//! │ INSUFFICIENT_STOCK   │ 400    │ CoreError::InsufficientStock           │
//! │ CONFLICT             │ 409    │ unique violation, row still referenced │
//! │ TIMEOUT              │ 503    │ request deadline exceeded              │
//! │ DATABASE_ERROR       │ 500    │ everything else from the store         │
//! │ INTERNAL             │ 500    │ unexpected                             │
//! └──────────────────────┴────────┴────────────────────────────────────────┘
//! ```
//!
//! 500 responses never carry driver detail; that goes to the log.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use store_core::{CoreError, ValidationError};
use store_db::DbError;

/// Machine-readable error code, serialized as `SCREAMING_SNAKE_CASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InsufficientStock,
    Conflict,
    Timeout,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::InsufficientStock => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error returned from handlers.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// Wire shape of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub error: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn timeout() -> Self {
        Self::new(ErrorCode::Timeout, "request timed out")
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::Internal, "internal server error")
    }

    fn database() -> Self {
        Self::new(ErrorCode::DatabaseError, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            error: self.message,
        };
        (self.code.status(), Json(body)).into_response()
    }
}

/// Convenience type alias for handler results.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::StillReferenced { .. } => {
                ApiError::new(ErrorCode::Conflict, err.to_string())
            }
            DbError::ForeignKeyViolation { .. } | DbError::CheckViolation { .. } => {
                ApiError::validation(err.to_string())
            }
            DbError::Validation(e) => e.into(),
            DbError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            other => {
                error!(error = %other, "Database operation failed");
                ApiError::database()
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => ApiError::not_found(err.to_string()),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
            CoreError::Storage(detail) => {
                error!(error = %detail, "Adding product to order failed");
                ApiError::database()
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_status() {
        let cases = [
            (CoreError::not_found("Order", 1), StatusCode::NOT_FOUND),
            (
                CoreError::InsufficientStock {
                    product_id: "p".to_string(),
                    available: 1,
                    requested: 2,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::Validation(ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::Storage("connection reset".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).code.status(), status);
        }
    }

    #[test]
    fn test_storage_detail_not_exposed() {
        let err = ApiError::from(CoreError::Storage("password authentication failed".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "internal server error");

        let err = ApiError::from(DbError::QueryFailed("syntax error at or near".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("syntax"));
    }

    #[test]
    fn test_db_error_status() {
        assert_eq!(
            ApiError::from(DbError::not_found("Product", "x")).code,
            ErrorCode::NotFound
        );
        assert_eq!(
            ApiError::from(DbError::UniqueViolation {
                constraint: "categories_slug_key".to_string()
            })
            .code,
            ErrorCode::Conflict
        );
        assert_eq!(
            ApiError::from(DbError::StillReferenced {
                message: "orders".to_string()
            })
            .code,
            ErrorCode::Conflict
        );
        assert_eq!(
            ApiError::from(DbError::ForeignKeyViolation {
                message: "customer".to_string()
            })
            .code,
            ErrorCode::ValidationError
        );
    }

    #[test]
    fn test_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::InsufficientStock).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_STOCK\"");
        assert_eq!(ErrorCode::Timeout.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
