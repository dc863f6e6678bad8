//! The book-network `/auth` endpoints.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use shelfguard_core::{
    ActivationRequest, AuthenticationRequest, AuthenticationService, Credential,
    RegistrationRequest, Result,
};

use crate::ApiClient;

const AUTHENTICATE: &str = "auth/authenticate";
const REGISTER: &str = "auth/register";
const ACTIVATE_ACCOUNT: &str = "auth/activate-account";

#[derive(Debug, Deserialize)]
struct AuthenticationResponse {
    token: String,
}

/// [`AuthenticationService`] over HTTP.
///
/// All three endpoints are public, so requests go out without a credential
/// even when the shared session holds one.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: ApiClient,
}

impl HttpAuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl AuthenticationService for HttpAuthService {
    #[instrument(skip(self, request), fields(email = %request.email()))]
    async fn authenticate(&self, request: &AuthenticationRequest) -> Result<Credential> {
        let response: AuthenticationResponse = self.client.post(AUTHENTICATE, request).await?;
        let credential = Credential::from_bearer(response.token)?;
        debug!(expires_at = ?credential.expires_at(), "Authenticated");
        Ok(credential)
    }

    #[instrument(skip(self, request), fields(email = %request.email()))]
    async fn register(&self, request: &RegistrationRequest) -> Result<()> {
        self.client.post_no_response(REGISTER, request).await
    }

    #[instrument(skip(self, request))]
    async fn confirm(&self, request: &ActivationRequest) -> Result<()> {
        self.client
            .get_no_response(ACTIVATE_ACCOUNT, &[("token", request.token().as_str())])
            .await?;
        info!("Activation code accepted");
        Ok(())
    }
}
