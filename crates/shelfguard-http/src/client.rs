//! HTTP client for the book-network API.

use reqwest::{RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use shelfguard_core::authorizer::AUTHORIZATION;
use shelfguard_core::error::Error;
use shelfguard_core::{ApiUrl, Authorize, RequestAuthorizer, Result, SessionStore};

use crate::error::{parse_error_response, transport_error};

/// A reqwest request waiting for its credential.
struct PendingRequest(RequestBuilder);

impl Authorize for PendingRequest {
    fn with_authorization(self, value: &str) -> Self {
        Self(self.0.header(AUTHORIZATION, value))
    }
}

/// HTTP client for the book-network API.
///
/// Public calls (`get`, `post`) never carry a credential. Authorized calls
/// (`*_authed`) read the session once, attach it, and clear that same
/// credential if the service answers 401 or 403.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api: ApiUrl,
    authorizer: RequestAuthorizer,
}

impl ApiClient {
    /// Create a client for `api` backed by the given session store.
    ///
    /// # Errors
    ///
    /// Fails with a transport error if the TLS backend cannot be initialized.
    pub fn new(api: ApiUrl, store: SessionStore) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shelfguard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            api,
            authorizer: RequestAuthorizer::new(store),
        })
    }

    /// Returns the API base URL this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    pub fn authorizer(&self) -> &RequestAuthorizer {
        &self.authorizer
    }

    pub fn store(&self) -> &SessionStore {
        self.authorizer.store()
    }

    /// Make an unauthenticated GET request.
    #[instrument(skip(self, params), fields(api = %self.api))]
    pub async fn get<Q, R>(&self, path: &str, params: &Q) -> Result<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "Public GET");

        let response = self.send_public(self.client.get(&url).query(params)).await?;
        handle_response(response).await
    }

    /// Make an unauthenticated GET request whose body is ignored.
    #[instrument(skip(self, params), fields(api = %self.api))]
    pub async fn get_no_response<Q>(&self, path: &str, params: &Q) -> Result<()>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "Public GET (no response)");

        let response = self.send_public(self.client.get(&url).query(params)).await?;
        expect_success(response).await
    }

    /// Make an unauthenticated POST request.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "Public POST");

        let response = self.send_public(self.client.post(&url).json(body)).await?;
        handle_response(response).await
    }

    /// Make an unauthenticated POST request whose body is ignored.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post_no_response<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "Public POST (no response)");

        let response = self.send_public(self.client.post(&url).json(body)).await?;
        expect_success(response).await
    }

    /// Make an authorized GET request.
    #[instrument(skip(self, params), fields(api = %self.api))]
    pub async fn get_authed<Q, R>(&self, path: &str, params: &Q) -> Result<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "Authorized GET");

        let response = self.send_authed(self.client.get(&url).query(params)).await?;
        handle_response(response).await
    }

    /// Make an authorized POST request.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post_authed<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "Authorized POST");

        let response = self.send_authed(self.client.post(&url).json(body)).await?;
        handle_response(response).await
    }

    /// Make an authorized POST request whose body is ignored.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post_authed_no_response<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "Authorized POST (no response)");

        let response = self.send_authed(self.client.post(&url).json(body)).await?;
        expect_success(response).await
    }

    async fn send_public(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(transport_error)?;
        trace!(status = %response.status(), "Response");
        Ok(response)
    }

    /// Attach the credential, send, and let the authorizer judge the status.
    async fn send_authed(&self, request: RequestBuilder) -> Result<Response> {
        let (PendingRequest(request), sent) = self.authorizer.authorize(PendingRequest(request));
        let response = request.send().await.map_err(transport_error)?;
        trace!(status = %response.status(), "Response");

        self.authorizer
            .check_status(response.status().as_u16(), sent.as_ref())?;
        Ok(response)
    }
}

/// Deserialize a success body or turn the response into a protocol error.
async fn handle_response<R: DeserializeOwned>(response: Response) -> Result<R> {
    if response.status().is_success() {
        response.json::<R>().await.map_err(transport_error)
    } else {
        Err(Error::Protocol(parse_error_response(response).await))
    }
}

async fn expect_success(response: Response) -> Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(Error::Protocol(parse_error_response(response).await))
    }
}
