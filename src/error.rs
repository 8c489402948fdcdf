//! Error handling module
//!
//! Centralized error type for the engine boundary. Every failure a caller
//! can see is converted to this shape; no partial state is ever visible
//! outside a committed step.

use crate::config::ConfigError;
use crate::domain::{AmountError, DomainError};

/// Postgres SQLSTATE raised when `lock_timeout` expires
const PG_LOCK_NOT_AVAILABLE: &str = "55P03";

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors
    #[error("Lock wait timed out")]
    LockTimeout,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Check if this is the caller's fault (validation, not-found, forbidden)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_client_error())
    }

    /// Check if retrying the same call may succeed. True only for failures
    /// where nothing was committed and the cause is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockTimeout)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.code().as_deref() == Some(PG_LOCK_NOT_AVAILABLE) {
                return AppError::LockTimeout;
            }
        }
        AppError::Database(err)
    }
}

impl From<AmountError> for AppError {
    fn from(err: AmountError) -> Self {
        AppError::Domain(DomainError::InvalidAmount(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_client_errors() {
        let err: AppError = DomainError::SameAccountTransfer.into();
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_lock_timeout_is_retryable() {
        let err = AppError::LockTimeout;
        assert!(err.is_retryable());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_database_error_is_not_retryable() {
        let err = AppError::Database(sqlx::Error::PoolClosed);
        assert!(!err.is_retryable());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_config_error_converts() {
        let err: AppError = ConfigError::MissingEnv("DATABASE_URL").into();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::MissingEnv("DATABASE_URL"))
        ));
        assert!(!err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_amount_error_maps_to_domain() {
        let err: AppError = AmountError::NotPositive(rust_decimal::Decimal::ZERO).into();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidAmount(_))
        ));
        assert!(err.is_client_error());
    }
}
