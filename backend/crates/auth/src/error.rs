//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration with an email that already exists
    #[error("A user with this email already exists")]
    EmailTaken,

    /// Profile update to an email owned by another user
    #[error("This email is already in use")]
    EmailInUse,

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No `Authorization: Bearer` header
    #[error("Authentication token missing")]
    MissingToken,

    /// Token past its `exp`
    #[error("Invalid authentication token")]
    TokenExpired,

    /// Bad signature, malformed, or wrong issuer/audience
    #[error("Invalid authentication token")]
    TokenInvalid,

    /// Role gate reached without an identity
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Identity present but role not allowed
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Public registration asked for `ADMIN` while disabled
    #[error("Administrator accounts cannot be self-registered")]
    AdminRegistrationDisabled,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Change-password with a wrong current password
    #[error("Current password is incorrect")]
    IncorrectCurrentPassword,

    /// JWT signing failed
    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    Password(#[from] PasswordHashError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken | AuthError::EmailInUse => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::AuthenticationRequired => ErrorKind::Unauthorized,
            AuthError::InsufficientPermissions | AuthError::AdminRegistrationDisabled => {
                ErrorKind::Forbidden
            }
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::IncorrectCurrentPassword => ErrorKind::BadRequest,
            AuthError::Database(e) => classify_sqlx(e).0,
            AuthError::TokenIssuance(_) | AuthError::Password(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Password(e) => {
                tracing::error!(error = %e, "Auth password hashing error");
            }
            AuthError::TokenIssuance(msg) | AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InsufficientPermissions => {
                tracing::warn!("Access denied by role check");
            }
            AuthError::AdminRegistrationDisabled => {
                tracing::warn!("Rejected self-registration as administrator");
            }
            AuthError::TokenExpired => {
                tracing::debug!("Expired bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(e) => AppError::from(e),
            other => {
                let message = other.to_string();
                AppError::new(other.kind(), message).with_source(other)
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(AuthError::EmailTaken.status_code(), 409);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::TokenExpired.status_code(), 401);
        assert_eq!(AuthError::InsufficientPermissions.status_code(), 403);
        assert_eq!(AuthError::UserNotFound.status_code(), 404);
        assert_eq!(AuthError::IncorrectCurrentPassword.status_code(), 400);
        assert_eq!(AuthError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_expired_and_invalid_share_message() {
        assert_eq!(
            AuthError::TokenExpired.to_string(),
            AuthError::TokenInvalid.to_string()
        );
    }

    #[test]
    fn test_database_error_goes_through_kernel_translation() {
        let app: AppError = AuthError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(app.kind(), ErrorKind::NotFound);
        assert_eq!(AuthError::Database(sqlx::Error::PoolTimedOut).status_code(), 503);
    }
}
