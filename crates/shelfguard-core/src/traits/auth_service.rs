//! Authentication service trait.

use async_trait::async_trait;

use crate::auth::{ActivationRequest, AuthenticationRequest, RegistrationRequest};
use crate::{Credential, Result};

/// The remote authentication endpoints of the book-network service.
///
/// These endpoints are public: implementations must not attach a session
/// credential to them.
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Exchange an email and password for a credential.
    async fn authenticate(&self, request: &AuthenticationRequest) -> Result<Credential>;

    /// Register a new, not yet activated, account.
    async fn register(&self, request: &RegistrationRequest) -> Result<()>;

    /// Confirm an activation code.
    ///
    /// A code the service rejects (unknown, expired, already used) must be
    /// reported as [`Error::Protocol`](crate::Error::Protocol); anything else
    /// (connectivity, timeouts) as another variant so callers can tell the
    /// two apart.
    async fn confirm(&self, request: &ActivationRequest) -> Result<()>;
}
