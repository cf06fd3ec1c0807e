//! Error taxonomy for the auth API and its mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application error type returned by handlers and extractors.
///
/// Credential failures deliberately share one message so callers cannot
/// probe which accounts exist; the same applies to refresh tokens, where
/// "unknown" and "expired" are indistinguishable.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Email address is already in use.")]
    EmailTaken,

    #[error("Username is already in use.")]
    UsernameTaken,

    #[error("Invalid email/username or password.")]
    InvalidCredentials,

    #[error("Account is inactive.")]
    AccountInactive,

    #[error("Missing or malformed Authorization header.")]
    MissingToken,

    #[error("Invalid token.")]
    TokenInvalid,

    #[error("Token has expired.")]
    TokenExpired,

    #[error("Invalid or expired refresh token.")]
    RefreshTokenInvalid,

    #[error("User not found.")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::EmailTaken | AppError::UsernameTaken => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::InvalidCredentials
            | AppError::AccountInactive
            | AppError::MissingToken
            | AppError::TokenInvalid
            | AppError::TokenExpired
            | AppError::RefreshTokenInvalid => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "message": message }))).into_response()
    }
}

/// Classify a sqlx error into a status and client-safe message.
///
/// Unique-index violations on the users table surface as duplicate errors so
/// the check-then-create race in registration still reports a duplicate
/// instead of a server fault. Everything else is logged and sanitized.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    if let sqlx::Error::Database(db_err) = err {
        // PostgreSQL unique violation: error code 23505.
        if db_err.code().as_deref() == Some("23505") {
            let message = match db_err.constraint() {
                Some("users_email_key") => "Email address is already in use.",
                Some("users_username_key") => "Username is already in use.",
                _ => "Duplicate value.",
            };
            return (StatusCode::BAD_REQUEST, message.to_string());
        }
    }
    tracing::error!(error = %err, "database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error.".to_string(),
    )
}
