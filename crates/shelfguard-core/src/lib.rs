//! shelfguard-core - client-side session and authorization primitives.
//!
//! Four components share one [`SessionStore`]:
//!
//! - [`SessionStore`] owns the current [`Credential`] and persists it.
//! - [`RequestAuthorizer`] attaches the credential to outbound requests and
//!   invalidates the session when the service rejects it.
//! - [`RouteGuard`] decides whether a protected view may render.
//! - [`ActivationFlow`] exchanges a one-time code for an active account.
//!
//! # Example
//!
//! ```
//! use shelfguard_core::{Credential, GuardDecision, Route, RouteGuard, SessionStore};
//!
//! let store = SessionStore::in_memory();
//! let guard = RouteGuard::new(store.clone());
//! let books = Route::new("/my-books").unwrap();
//!
//! assert_eq!(guard.evaluate(&books), GuardDecision::Blocked);
//! store.set(Credential::new("abc123").unwrap()).unwrap();
//! assert_eq!(guard.evaluate(&books), GuardDecision::Open);
//! ```

pub mod activation;
pub mod auth;
pub mod authenticator;
pub mod authorizer;
pub mod credential;
pub mod error;
pub mod guard;
pub mod memory;
pub mod session;
pub mod store;
pub mod traits;
pub mod types;

pub use activation::{ActivationFlow, ActivationState, ActivationView, Completion};
pub use auth::{ActivationRequest, AuthenticationRequest, RegistrationRequest};
pub use authenticator::Authenticator;
pub use authorizer::{Authorize, OutboundRequest, RequestAuthorizer};
pub use credential::{AccessToken, Credential, RefreshToken};
pub use error::Error;
pub use guard::{GuardDecision, ProtectedRoutes, RouteGuard};
pub use memory::MemoryStorage;
pub use session::SessionState;
pub use store::SessionStore;
pub use traits::{AuthenticationService, Navigator, SessionStorage};
pub use types::{ActivationCode, ApiUrl, Route};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
