//! Error types for the ElevenLabs API client.

use serde::Deserialize;
use thiserror::Error;

/// Maximum number of payload bytes kept in a decode error.
const FRAGMENT_LIMIT: usize = 512;

/// Result type alias for ElevenLabs operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ElevenLabs API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx response returned by the API.
    #[error("elevenlabs: {message} (http={http_status}, status={status})")]
    Api {
        http_status: u16,
        status: String,
        message: String,
        body: String,
    },

    /// Network or transport failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request body could not be built. Raised before anything is sent.
    #[error("failed to build request body: {0}")]
    Encode(String),

    /// Response body does not match the expected shape.
    #[error("failed to decode {target}: {message} (payload: {fragment})")]
    Decode {
        target: &'static str,
        message: String,
        fragment: String,
    },

    /// Request violates a precondition.
    #[error("invalid request: {0}")]
    Validation(String),

    /// IO error while copying a stream into a sink.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates a decode error from a serde failure and the offending payload.
    pub fn decode(target: &'static str, err: impl std::fmt::Display, payload: &[u8]) -> Self {
        Error::Decode {
            target,
            message: err.to_string(),
            fragment: fragment(payload),
        }
    }

    /// Builds an API error from a non-2xx status and its raw body.
    ///
    /// The service reports failures as `{"detail": {"status": .., "message": ..}}`,
    /// `{"detail": "text"}` or a list of validation entries. Anything else keeps
    /// the raw body as the message.
    pub fn from_response(http_status: u16, body: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(body).into_owned();

        let (status, message) = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody {
                detail: Some(Detail::Status { status, message }),
            }) => (status, message),
            Ok(ErrorBody {
                detail: Some(Detail::Text(message)),
            }) => (String::new(), message),
            Ok(ErrorBody {
                detail: Some(Detail::Other(value)),
            }) => (String::new(), value.to_string()),
            _ => (String::new(), raw.clone()),
        };

        Error::Api {
            http_status,
            status,
            message,
            body: raw,
        }
    }

    /// Returns the HTTP status code if this is an API error.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Api { http_status, .. } => Some(*http_status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.http_status() == Some(429)
    }

    /// Returns true if this is an invalid API key error.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.http_status(), Some(401) | Some(403))
    }

    /// Returns true if the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    /// Returns true if the request ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }

    /// Returns true if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.http_status(), Some(s) if s >= 500)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Status {
        #[serde(default)]
        status: String,
        message: String,
    },
    Text(String),
    Other(serde_json::Value),
}

/// Truncates a payload for error reporting, keeping char boundaries.
pub(crate) fn fragment(payload: &[u8]) -> String {
    let text = String::from_utf8_lossy(payload);
    if text.len() <= FRAGMENT_LIMIT {
        return text.into_owned();
    }
    let mut end = FRAGMENT_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
