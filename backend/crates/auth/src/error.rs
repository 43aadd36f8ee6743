//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. The internal reason behind a 401 is
//! logged but never rendered.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::application::token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Why a request was rejected as unauthenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// No `Authorization: Bearer` header
    MissingCredential,
    /// Token could not be parsed
    InvalidFormat,
    /// Token signature did not verify
    BadSignature,
    /// Token is past its expiry
    Expired,
    /// Password changed after the token was issued
    StaleCredential,
    /// Token subject no longer exists or was deactivated
    IdentityGone,
    /// Login with unknown email or wrong password
    InvalidCredentials,
    /// Authenticated but role is outside the allowed set
    InsufficientRole,
}

impl UnauthorizedReason {
    pub const fn as_str(&self) -> &'static str {
        use UnauthorizedReason::*;
        match self {
            MissingCredential => "missing_credential",
            InvalidFormat => "invalid_format",
            BadSignature => "bad_signature",
            Expired => "expired",
            StaleCredential => "stale_credential",
            IdentityGone => "identity_gone",
            InvalidCredentials => "invalid_credentials",
            InsufficientRole => "insufficient_role",
        }
    }

    /// Message shown to the client
    pub const fn public_message(&self) -> &'static str {
        use UnauthorizedReason::*;
        match self {
            MissingCredential => "You are not logged in. Please log in to get access",
            InvalidCredentials => "Incorrect email or password",
            InsufficientRole => "You do not have permission to perform this action",
            InvalidFormat | BadSignature | Expired | StaleCredential | IdentityGone => {
                "Invalid or expired token. Please log in again"
            }
        }
    }
}

impl fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TokenError> for UnauthorizedReason {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidFormat => UnauthorizedReason::InvalidFormat,
            TokenError::BadSignature => UnauthorizedReason::BadSignature,
            TokenError::Expired => UnauthorizedReason::Expired,
        }
    }
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or policy-violating input
    #[error("{0}")]
    Validation(String),

    /// Email already registered
    #[error("Email is already in use")]
    EmailTaken,

    #[error("Unauthorized: {0}")]
    Unauthorized(UnauthorizedReason),

    #[error("{0}")]
    NotFound(String),

    /// The row changed after it was read; the write was refused
    #[error("Your account was changed by another request. Please try again")]
    StaleWrite,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AuthError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AuthError::NotFound(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken | AuthError::StaleWrite => StatusCode::CONFLICT,
            AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken | AuthError::StaleWrite => ErrorKind::Conflict,
            AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Server-side detail is replaced with an opaque message.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Unauthorized(reason) => {
                AppError::unauthorized(reason.public_message()).with_action("Log in again")
            }
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Something went wrong")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Unauthorized(UnauthorizedReason::InvalidCredentials) => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Unauthorized(
                reason @ (UnauthorizedReason::BadSignature | UnauthorizedReason::StaleCredential),
            ) => {
                tracing::warn!(reason = %reason, "Rejected credential");
            }
            AuthError::Unauthorized(reason) => {
                tracing::debug!(reason = %reason, "Unauthenticated request");
            }
            AuthError::StaleWrite => {
                tracing::warn!("Concurrent identity write refused");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.message().to_string())
            }
            ErrorKind::NotFound => AuthError::NotFound(err.message().to_string()),
            ErrorKind::Conflict => AuthError::EmailTaken,
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Unauthorized(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::StaleWrite.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::Unauthorized(UnauthorizedReason::Expired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_token_reasons_share_public_message() {
        let expired = AuthError::Unauthorized(UnauthorizedReason::Expired).to_app_error();
        let tampered = AuthError::Unauthorized(UnauthorizedReason::BadSignature).to_app_error();
        let stale = AuthError::Unauthorized(UnauthorizedReason::StaleCredential).to_app_error();
        assert_eq!(expired.message(), tampered.message());
        assert_eq!(expired.message(), stale.message());
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = AuthError::Internal("pool exhausted at 10.0.0.3".into()).to_app_error();
        assert!(!err.message().contains("10.0.0.3"));
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn test_app_error_bad_request_becomes_validation() {
        let err: AuthError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "Invalid email format"));
    }
}
