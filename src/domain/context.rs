//! Principal context
//!
//! The authenticated identity on whose behalf an operation runs. The engine
//! takes a `Principal` explicitly on every call; there is no ambient
//! security context to resolve from.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

/// Identity of the authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(Uuid);

impl Principal {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for Principal {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Collaborator contract for resolving the current principal.
///
/// Token parsing and session handling live outside this crate; an embedding
/// service implements this against whatever auth layer it runs.
pub trait IdentityProvider {
    /// Resolve the authenticated principal for the current call.
    ///
    /// # Errors
    /// `DomainError::Unauthenticated` when no valid session exists.
    fn current_principal(&self) -> Result<Principal, DomainError>;
}

/// Identity provider bound to a single known principal. Useful for embedding
/// the engine in contexts where authentication happened upstream, and for
/// tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity(Option<Principal>);

impl FixedIdentity {
    pub fn authenticated(principal: Principal) -> Self {
        Self(Some(principal))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_principal(&self) -> Result<Principal, DomainError> {
        self.0.ok_or(DomainError::Unauthenticated)
    }
}
