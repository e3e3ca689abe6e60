//! # API Error Types
//!
//! The single error type handlers return, and its mapping to HTTP responses.
//!
//! ## Status Mapping
//! ```text
//! StoreError::Validation           → 400 validation
//! StoreError::InsufficientStock    → 409 insufficient_stock
//! DbError::NotFound                → 404 not_found
//! DbError::UniqueViolation         → 409 duplicate
//! DbError::ForeignKeyViolation     → 400 invalid_reference
//! missing/invalid token            → 401 unauthorized
//! wrong role                       → 403 forbidden
//! anything else                    → 500 internal (detail logged, not sent)
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use mercado_core::ValidationError;
use mercado_db::{DbError, StoreError};

/// An error ready to be serialized as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    /// Stable machine-readable code for the client.
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, "validation", message)
    }

    pub fn unauthorized() -> Self {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Authentication required",
        )
    }

    pub fn forbidden() -> Self {
        ApiError::new(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Insufficient permissions",
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn internal() -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "Internal server error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found(err.to_string()),
            DbError::UniqueViolation { .. } => {
                ApiError::new(StatusCode::CONFLICT, "duplicate", err.to_string())
            }
            DbError::ForeignKeyViolation { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                "invalid_reference",
                "Request references an unknown record",
            ),
            other => {
                // Infrastructure detail stays in the log.
                error!(error = %other, "Database error");
                ApiError::internal()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(v) => v.into(),
            StoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => ApiError::new(
                StatusCode::CONFLICT,
                "insufficient_stock",
                format!(
                    "Insufficient stock for product {product_id}: available {available}, requested {requested}"
                ),
            ),
            StoreError::Unexpected(db) => db.into(),
        }
    }
}

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_maps_to_conflict() {
        let err: ApiError = StoreError::InsufficientStock {
            product_id: "p1".to_string(),
            available: 1,
            requested: 3,
        }
        .into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, "insufficient_stock");
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err: ApiError = DbError::Internal("pool exploded".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("pool"));
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Product", "p9").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
