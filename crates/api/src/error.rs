use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use lockpay_core::error::CLAIM_NOT_FOUND_MSG;
use lockpay_core::LedgerError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`LedgerError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A failure outside the ledger's error vocabulary (infrastructure,
    /// serialization). Sanitized before it reaches a client.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- LedgerError variants ---
            AppError::Ledger(err) => match err {
                LedgerError::InvalidArgument(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                LedgerError::NotFound { entity } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    // Claim-key misses get the product wording; it must stay
                    // identical for wrong contact, wrong PIN, and consumed
                    // locks alike.
                    if *entity == "claim" {
                        CLAIM_NOT_FOUND_MSG.to_string()
                    } else {
                        err.to_string()
                    },
                ),
                LedgerError::InsufficientBalance { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INSUFFICIENT_BALANCE",
                    err.to_string(),
                ),
                LedgerError::DuplicateLock => {
                    (StatusCode::CONFLICT, "DUPLICATE_LOCK", err.to_string())
                }
                LedgerError::Expired { .. } => (StatusCode::GONE, "LOCK_EXPIRED", err.to_string()),
                LedgerError::InvalidState { .. } => {
                    (StatusCode::CONFLICT, "INVALID_STATE", err.to_string())
                }
                LedgerError::Storage(msg) => {
                    tracing::error!(error = %msg, "Storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
