use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;

/// Error taxonomy for the storefront API. Every backend failure is converted
/// to one of these kinds at the service boundary; raw database errors never
/// reach a client.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Malformed input; the caller's fault, not retryable as-is
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Missing or expired session; the caller must re-authenticate
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// Business-rule rejection, surfaced verbatim to the UI
    #[error("Out of stock: {0}")]
    OutOfStock(String),
    /// A backend call failed; detail is logged server-side only
    #[error("Database error: {0}")]
    PersistenceFailure(String),
    /// Checkout recorded the purchase but could not clear the cart;
    /// degraded state that operators reconcile, not a rollback
    #[error("Cart cleanup failed: {0}")]
    CartCleanupFailed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Stable machine-readable code included in every error body
    fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidRequest(_) => "invalid_request",
            StoreError::Unauthorized(_) => "unauthorized",
            StoreError::NotFound(_) => "not_found",
            StoreError::OutOfStock(_) => "out_of_stock",
            StoreError::PersistenceFailure(_) => "persistence_failure",
            StoreError::CartCleanupFailed(_) => "cart_cleanup_failed",
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match self {
            StoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::OutOfStock(_) => StatusCode::CONFLICT,
            StoreError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::CartCleanupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

// DbError to StoreError conversion implementation
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        StoreError::PersistenceFailure(err.to_string())
    }
}
