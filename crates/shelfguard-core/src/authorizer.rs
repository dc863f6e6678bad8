//! Credential attachment for outbound requests.
//!
//! The authorizer is a request transform composed at the transport
//! boundary: `(request, session) -> request'`. Any HTTP client can use it by
//! implementing [`Authorize`] for its request type.

use tracing::{debug, warn};

use crate::Result;
use crate::credential::Credential;
use crate::error::{AuthError, is_rejection_status};
use crate::store::SessionStore;

/// Name of the header carrying the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// A request that can carry an authorization header.
pub trait Authorize: Sized {
    /// Return the request with `value` set as its `Authorization` header.
    fn with_authorization(self, value: &str) -> Self;
}

/// A transport-neutral outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Vec::new(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Set a header, replacing any existing value (names are case-insensitive).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Look up a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

impl Authorize for OutboundRequest {
    fn with_authorization(self, value: &str) -> Self {
        self.with_header(AUTHORIZATION, value)
    }
}

/// Attaches the stored credential to requests and reacts to rejection.
#[derive(Debug, Clone)]
pub struct RequestAuthorizer {
    store: SessionStore,
}

impl RequestAuthorizer {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The `Authorization` header value for the current credential.
    pub fn authorization(&self) -> Option<String> {
        self.store.get().map(|credential| bearer(&credential))
    }

    /// Attach the current credential to `request`.
    ///
    /// The credential is read exactly once, so a concurrent `clear` yields
    /// either the whole credential or nothing. It is returned alongside the
    /// request and must be handed back to [`check_status`](Self::check_status).
    /// Without a stored credential the request is returned unchanged.
    pub fn authorize<R: Authorize>(&self, request: R) -> (R, Option<Credential>) {
        match self.store.get() {
            Some(credential) => {
                debug!("Attaching bearer credential");
                (request.with_authorization(&bearer(&credential)), Some(credential))
            }
            None => (request, None),
        }
    }

    /// React to a response status from the protected service.
    ///
    /// `sent` is the credential the request carried. A rejection (401/403)
    /// clears the session only if that credential is still the stored one,
    /// and always surfaces [`AuthError::Unauthorized`]; the request is never
    /// retried. Every other status passes through.
    pub fn check_status(&self, status: u16, sent: Option<&Credential>) -> Result<()> {
        if !is_rejection_status(status) {
            return Ok(());
        }

        match sent.map(|credential| self.store.clear_if(credential)) {
            Some(Ok(true)) => warn!(status, "Request rejected by service, session invalidated"),
            Some(Ok(false)) => warn!(status, "Request rejected for a superseded credential"),
            Some(Err(e)) => warn!(error = %e, "Failed to remove persisted session"),
            None => warn!(status, "Request without credential rejected by service"),
        }
        Err(AuthError::Unauthorized.into())
    }
}

fn bearer(credential: &Credential) -> String {
    format!("Bearer {}", credential.access_token().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn authorizer_with(token: Option<&str>) -> RequestAuthorizer {
        let store = SessionStore::in_memory();
        if let Some(token) = token {
            store.set(Credential::new(token).unwrap()).unwrap();
        }
        RequestAuthorizer::new(store)
    }

    #[test]
    fn attaches_bearer_when_present() {
        let authorizer = authorizer_with(Some("abc123"));
        let (request, sent) = authorizer.authorize(OutboundRequest::new("GET", "/books"));
        assert_eq!(request.header("authorization"), Some("Bearer abc123"));
        assert_eq!(sent, authorizer.store().get());
        assert_eq!(authorizer.authorization().as_deref(), Some("Bearer abc123"));
    }

    #[test]
    fn forwards_unmodified_when_absent() {
        let authorizer = authorizer_with(None);
        let original = OutboundRequest::new("POST", "/auth/authenticate")
            .with_header("Content-Type", "application/json");
        let (request, sent) = authorizer.authorize(original.clone());
        assert_eq!(request, original);
        assert!(request.header(AUTHORIZATION).is_none());
        assert!(sent.is_none());
    }

    #[test]
    fn replaces_existing_authorization_header() {
        let authorizer = authorizer_with(Some("fresh"));
        let (request, _) = authorizer.authorize(
            OutboundRequest::new("GET", "/books").with_header("authorization", "Bearer stale"),
        );
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer fresh"));
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn rejection_clears_session() {
        for status in [401, 403] {
            let authorizer = authorizer_with(Some("abc123"));
            let (_, sent) = authorizer.authorize(OutboundRequest::new("GET", "/books"));
            let err = authorizer.check_status(status, sent.as_ref()).unwrap_err();
            assert!(matches!(err, Error::Auth(AuthError::Unauthorized)));
            assert!(!authorizer.store().is_authenticated());
            assert!(authorizer.store().get().is_none());
        }
    }

    #[test]
    fn late_rejection_keeps_newer_login() {
        let authorizer = authorizer_with(Some("old-token"));
        let (request, sent) = authorizer.authorize(OutboundRequest::new("GET", "/books"));
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer old-token"));

        // A login completes while the request is in flight.
        let fresh = Credential::new("fresh-token").unwrap();
        authorizer.store().set(fresh.clone()).unwrap();

        let err = authorizer.check_status(401, sent.as_ref()).unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(authorizer.store().get(), Some(fresh));
    }

    #[test]
    fn rejection_without_credential_keeps_store() {
        let authorizer = authorizer_with(None);
        let (_, sent) = authorizer.authorize(OutboundRequest::new("GET", "/books"));

        let fresh = Credential::new("fresh-token").unwrap();
        authorizer.store().set(fresh.clone()).unwrap();

        assert!(authorizer.check_status(403, sent.as_ref()).unwrap_err().is_unauthorized());
        assert_eq!(authorizer.store().get(), Some(fresh));
    }

    #[test]
    fn other_statuses_pass_through() {
        let authorizer = authorizer_with(Some("abc123"));
        let (_, sent) = authorizer.authorize(OutboundRequest::new("GET", "/books"));
        for status in [200, 201, 204, 400, 404, 500, 503] {
            authorizer.check_status(status, sent.as_ref()).unwrap();
        }
        assert!(authorizer.store().is_authenticated());
    }

    #[test]
    fn cleared_session_stops_attaching() {
        let authorizer = authorizer_with(Some("abc123"));
        let (_, sent) = authorizer.authorize(OutboundRequest::new("GET", "/books"));
        let _ = authorizer.check_status(401, sent.as_ref());
        let (request, sent) = authorizer.authorize(OutboundRequest::new("GET", "/books"));
        assert!(request.header(AUTHORIZATION).is_none());
        assert!(sent.is_none());
    }
}
