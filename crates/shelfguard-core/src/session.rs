//! Derived session state.

use chrono::{DateTime, Utc};

use crate::Credential;

/// A point-in-time view of the session, read once from the store.
///
/// Components take a snapshot per operation and drop it afterwards so a
/// logout or rejection is observed by the next operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    credential: Option<Credential>,
}

impl SessionState {
    pub fn new(credential: Option<Credential>) -> Self {
        Self { credential }
    }

    /// The unauthenticated state.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Authenticated means a credential is present and not expired at `now`.
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.credential
            .as_ref()
            .is_some_and(|credential| !credential.is_expired_at(now))
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn anonymous_is_not_authenticated() {
        assert!(!SessionState::anonymous().is_authenticated());
    }

    #[test]
    fn expiry_boundary_fails_closed() {
        let now = Utc::now();
        let state = SessionState::new(Some(Credential::new("abc").unwrap().with_expiry(Some(now))));
        assert!(!state.is_authenticated_at(now));
        assert!(state.is_authenticated_at(now - Duration::milliseconds(1)));
    }
}
