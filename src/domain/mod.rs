//! Domain types
//!
//! Validated money primitives, the principal context, and pure domain errors.

pub mod context;
pub mod error;
pub mod money;

pub use context::{FixedIdentity, IdentityProvider, Principal};
pub use error::DomainError;
pub use money::{Amount, AmountError, Balance};
