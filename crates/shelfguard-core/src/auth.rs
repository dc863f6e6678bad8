//! Request payloads sent to the authentication service.

use std::fmt;

use serde::Serialize;

use crate::types::ActivationCode;

/// Login request: email and password.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use shelfguard_core::AuthenticationRequest;
///
/// let request = AuthenticationRequest::new("alice@example.com", "s3cret-pass");
/// assert_eq!(request.email(), "alice@example.com");
/// ```
#[derive(Clone, Serialize)]
pub struct AuthenticationRequest {
    email: String,
    password: String,
}

impl AuthenticationRequest {
    /// Create a login request.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns the email used to log in.
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for AuthenticationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account registration request.
///
/// The account stays disabled until it is activated with the code the
/// service sends by email.
#[derive(Clone, Serialize)]
pub struct RegistrationRequest {
    firstname: String,
    lastname: String,
    email: String,
    password: String,
}

impl RegistrationRequest {
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A single activation attempt, `{ token: code }`.
///
/// Consumed by exactly one confirm call; never reused after it resolves.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationRequest {
    token: ActivationCode,
}

impl ActivationRequest {
    pub fn new(token: ActivationCode) -> Self {
        Self { token }
    }

    /// Returns the code being confirmed.
    pub fn token(&self) -> &ActivationCode {
        &self.token
    }
}
