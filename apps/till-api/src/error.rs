//! # Error Types
//!
//! Service-level errors and their HTTP representation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Till                                   │
//! │                                                                         │
//! │  Handler ──► Service ──► UnitOfWork                                    │
//! │                 │             │                                         │
//! │                 │             └── DbError ──────┐                       │
//! │                 │                               ▼                       │
//! │                 └── CoreError ───────────► ServiceError                 │
//! │                                                 │                       │
//! │                                                 ▼                       │
//! │                                             ApiError ──► HTTP response  │
//! │                                                                         │
//! │  InvalidItem / InvalidQuantity / InvalidPayment /                     │
//! │  AmountOverflow / InsufficientPayment /                               │
//! │  unreadable JSON body                     → 400 Bad Request            │
//! │  ItemNotFound / OrderNotFound /                                        │
//! │  ReceiptNotFound                          → 404 Not Found              │
//! │  OrderAlreadyPaid                         → 409 Conflict               │
//! │  DbError                                  → 500 (details logged only)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use till_core::CoreError;
use till_db::DbError;

// =============================================================================
// Service Error
// =============================================================================

/// Failure of a service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Business-rule failure; nothing was committed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure, propagated unchanged.
    #[error(transparent)]
    Db(#[from] DbError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// API Error
// =============================================================================

/// Error body returned by every failing endpoint.
///
/// ```json
/// { "code": "INSUFFICIENT_PAYMENT", "error": "insufficient payment" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,

    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message
    #[serde(rename = "error")]
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request data failed validation (400)
    ValidationError,

    /// Payment does not cover the order total (400)
    InsufficientPayment,

    /// Resource not found (404)
    NotFound,

    /// Order is already settled (409)
    OrderAlreadyPaid,

    /// Database operation failed (500)
    DatabaseError,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    fn database(message: &str) -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidItem(_)
            | CoreError::InvalidQuantity(_)
            | CoreError::InvalidPayment(_)
            | CoreError::AmountOverflow => {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, message)
            }
            CoreError::InsufficientPayment { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InsufficientPayment, message)
            }
            CoreError::ItemNotFound(_)
            | CoreError::OrderNotFound(_)
            | CoreError::ReceiptNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
            }
            CoreError::OrderAlreadyPaid(_) => {
                ApiError::new(StatusCode::CONFLICT, ErrorCode::OrderAlreadyPaid, message)
            }
        }
    }
}

/// Storage details are logged, never sent to the client.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                tracing::error!(error = %err, "Database unavailable");
                ApiError::database("Database unavailable")
            }
            DbError::TransactionFailed(ref e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::database("Database transaction failed")
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::database("Database operation failed")
            }
        }
    }
}

/// A body axum could not read as the expected JSON.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Rejected request body");
        ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::ValidationError,
            rejection.body_text(),
        )
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(e) => e.into(),
            ServiceError::Db(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
