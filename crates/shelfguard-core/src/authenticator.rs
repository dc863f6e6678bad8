//! Login and logout: the writers of the session store.

use tracing::{info, instrument};

use crate::Result;
use crate::auth::{AuthenticationRequest, RegistrationRequest};
use crate::store::SessionStore;
use crate::traits::AuthenticationService;

/// Pairs an [`AuthenticationService`] with the [`SessionStore`] it fills.
pub struct Authenticator<S> {
    service: S,
    store: SessionStore,
}

impl<S: AuthenticationService> Authenticator<S> {
    pub fn new(service: S, store: SessionStore) -> Self {
        Self { service, store }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Authenticate and store the resulting credential.
    ///
    /// On failure the previously stored credential is left as it was.
    #[instrument(skip(self, request), fields(email = %request.email()))]
    pub async fn login(&self, request: &AuthenticationRequest) -> Result<()> {
        let credential = self.service.authenticate(request).await?;
        self.store.set(credential)?;
        info!("Logged in");
        Ok(())
    }

    /// Register an account; it stays inactive until activated.
    #[instrument(skip(self, request), fields(email = %request.email()))]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<()> {
        self.service.register(request).await?;
        info!("Registration accepted, activation code sent");
        Ok(())
    }

    /// Forget the stored credential. Logging out twice is fine.
    pub fn logout(&self) -> Result<()> {
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }
}
