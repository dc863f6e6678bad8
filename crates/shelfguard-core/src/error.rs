//! Error types for shelfguard.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authorization, protocol, input validation and storage errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for shelfguard operations.
///
/// Callers can match on the variant to tell an authorization rejection
/// apart from a connectivity problem or a malformed input.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, HTTP plumbing).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication and authorization errors.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Unexpected non-success responses from the remote service.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (URL, activation code, route).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Persistent client storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns true if this error is an authorization rejection.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Auth(AuthError::Unauthorized))
    }

    /// A short, non-technical message suitable for showing to a user.
    ///
    /// Never contains token material or raw server output.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::Transport(_) => "The service could not be reached. Please try again.",
            Error::Auth(AuthError::Unauthorized) => "Your session has ended. Please log in again.",
            Error::Auth(AuthError::InvalidCredential { .. }) => "The login response was not usable.",
            Error::Auth(AuthError::ActivationFailed { reason }) => reason.message(),
            Error::Protocol(_) => "The service rejected the request.",
            Error::InvalidInput(_) => "The input is not valid.",
            Error::Storage(_) => "The session could not be saved on this device.",
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication and authorization errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A credential violated the non-empty access token invariant.
    #[error("invalid credential: {reason}")]
    InvalidCredential { reason: String },

    /// The remote service rejected the request's credential.
    #[error("unauthorized")]
    Unauthorized,

    /// The activation code was not accepted.
    #[error("activation failed: {reason}")]
    ActivationFailed { reason: ActivationFailure },
}

/// Why an activation attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationFailure {
    /// The service rejected the code as expired or unknown.
    ExpiredOrInvalid,
    /// Anything else: the service was unreachable or misbehaved.
    Other,
}

impl ActivationFailure {
    /// The message shown to the user for this failure.
    pub fn message(&self) -> &'static str {
        match self {
            ActivationFailure::ExpiredOrInvalid => "Token has been expired or invalid",
            ActivationFailure::Other => "Account activation failed. Please try again later.",
        }
    }
}

impl fmt::Display for ActivationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationFailure::ExpiredOrInvalid => f.write_str("code expired or invalid"),
            ActivationFailure::Other => f.write_str("confirmation error"),
        }
    }
}

/// Maximum length kept from a server message.
const MAX_MESSAGE_LENGTH: usize = 200;

/// Protocol-level errors from non-success responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server, if any.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error, truncating long server messages.
    pub fn new(status: u16, message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .map(|m| {
                if m.chars().count() <= MAX_MESSAGE_LENGTH {
                    m
                } else {
                    let cut: String = m.chars().take(MAX_MESSAGE_LENGTH).collect();
                    format!("{}...", cut)
                }
            });
        Self { status, message }
    }
}

/// Returns true for the statuses the service uses to reject a credential.
///
/// The service answers a missing or expired bearer token with 401 or 403
/// depending on the filter that rejects it, so both count.
pub fn is_rejection_status(status: u16) -> bool {
    status == 401 || status == 403
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid activation code.
    #[error("invalid activation code: {reason}")]
    ActivationCode { reason: String },

    /// Invalid navigation route.
    #[error("invalid route '{value}': {reason}")]
    Route { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Persistent storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("I/O error on '{key}': {message}")]
    Io { key: String, message: String },

    /// A value could not be serialized.
    #[error("could not encode '{key}': {message}")]
    Encode { key: String, message: String },

    /// A stored value could not be decoded. SessionStore heals this itself.
    #[error("corrupted value under '{key}': {message}")]
    Corrupted { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_statuses() {
        assert!(is_rejection_status(401));
        assert!(is_rejection_status(403));
        assert!(!is_rejection_status(404));
        assert!(!is_rejection_status(500));
    }

    #[test]
    fn protocol_error_truncates_long_messages() {
        let err = ProtocolError::new(500, Some("x".repeat(1000)));
        let message = err.message.unwrap();
        assert!(message.ends_with("..."));
        assert_eq!(message.chars().count(), MAX_MESSAGE_LENGTH + 3);
    }

    #[test]
    fn protocol_error_drops_blank_message() {
        let err = ProtocolError::new(502, Some("   ".to_string()));
        assert!(err.message.is_none());
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn activation_failure_messages_differ() {
        assert_ne!(
            ActivationFailure::ExpiredOrInvalid.message(),
            ActivationFailure::Other.message()
        );
        assert!(
            ActivationFailure::ExpiredOrInvalid
                .message()
                .contains("expired or invalid")
        );
    }

    #[test]
    fn auth_errors_map_to_distinct_messages() {
        let messages: Vec<&str> = [
            AuthError::InvalidCredential {
                reason: "empty".into(),
            },
            AuthError::Unauthorized,
            AuthError::ActivationFailed {
                reason: ActivationFailure::ExpiredOrInvalid,
            },
        ]
        .into_iter()
        .map(|e| Error::Auth(e).user_message())
        .collect();

        assert_eq!(messages.len(), 3);
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
    }

    #[test]
    fn user_message_for_unauthorized() {
        let err = Error::Auth(AuthError::Unauthorized);
        assert!(err.is_unauthorized());
        assert!(err.user_message().contains("log in"));
    }
}
