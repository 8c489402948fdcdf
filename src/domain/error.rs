//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::money::AmountError;

/// Business rule violations and domain invariant failures.
///
/// These are independent of the storage layer. Insufficient funds is
/// deliberately absent: it is a recorded transfer outcome, not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Transfer where both sides name the same account
    #[error("Transfer accounts must be different")]
    SameAccountTransfer,

    /// Invalid monetary value (zero, negative, too precise, too large)
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Account key does not resolve to an existing account
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Principal does not own the source account
    #[error("Cannot transfer from this account")]
    NotAccountOwner,

    /// No authenticated principal in the calling context
    #[error("Not authenticated")]
    Unauthenticated,
}

impl DomainError {
    /// Check if this is a client error (caller's fault, safe to surface)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::SameAccountTransfer
                | Self::InvalidAmount(_)
                | Self::AccountNotFound(_)
                | Self::NotAccountOwner
                | Self::Unauthenticated
        )
    }

    /// Check if this is an authorization failure. Embedding services map
    /// these to a forbidden status, distinct from validation and not-found.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::NotAccountOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_same_account_error() {
        let err = DomainError::SameAccountTransfer;
        assert!(err.is_client_error());
        assert!(!err.is_forbidden());
        assert_eq!(err.to_string(), "Transfer accounts must be different");
    }

    #[test]
    fn test_not_owner_is_forbidden() {
        let err = DomainError::NotAccountOwner;
        assert!(err.is_client_error());
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_amount_error_converts() {
        let err: DomainError = AmountError::NotPositive(Decimal::ZERO).into();
        assert!(matches!(err, DomainError::InvalidAmount(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_account_not_found_carries_key() {
        let err = DomainError::AccountNotFound("ACC-999".to_string());
        assert!(err.to_string().contains("ACC-999"));
    }
}
