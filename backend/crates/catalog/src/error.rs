//! Catalog Error Types
//!
//! Catalog-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific error variants
#[derive(Debug, Error)]
pub enum CatalogError {
    /// SKU already used by another product
    #[error("A product with this SKU already exists")]
    SkuTaken,

    /// Product not found
    #[error("Product not found")]
    ProductNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::SkuTaken => ErrorKind::Conflict,
            CatalogError::ProductNotFound => ErrorKind::NotFound,
            CatalogError::Database(e) => classify_sqlx(e).0,
            CatalogError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Database(e) => AppError::from(e),
            other => {
                let message = other.to_string();
                AppError::new(other.kind(), message).with_source(other)
            }
        }
    }
}

impl IntoResponse for CatalogError {
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
        assert_eq!(CatalogError::SkuTaken.status_code(), 409);
        assert_eq!(CatalogError::ProductNotFound.status_code(), 404);
        assert_eq!(CatalogError::Internal("x".into()).status_code(), 500);
        assert_eq!(
            CatalogError::Database(sqlx::Error::PoolTimedOut).status_code(),
            503
        );
    }

    #[test]
    fn test_message_is_public_for_client_errors() {
        let app: AppError = CatalogError::SkuTaken.into();
        assert_eq!(app.public_message(), "A product with this SKU already exists");
    }
}
