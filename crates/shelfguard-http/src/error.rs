//! Mapping of reqwest failures and error responses.

use serde::Deserialize;
use shelfguard_core::error::{Error, ProtocolError, TransportError};

/// Convert a reqwest failure into a transport error.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    business_error_description: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

/// Build a [`ProtocolError`] from a non-success response.
///
/// JSON bodies contribute their most specific message; anything else is
/// kept as text.
pub(crate) async fn parse_error_response(response: reqwest::Response) -> ProtocolError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body
            .business_error_description
            .or(body.message)
            .or(body.error),
        Err(_) => Some(text),
    };
    ProtocolError::new(status, message)
}
