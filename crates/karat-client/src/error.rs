//! Error types for the client crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the API gateway.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot be used.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The API rejected the credential. The session has already been cleared.
    #[error("authentication required")]
    Unauthorized,

    /// Any other non-success status, passed through from the API.
    #[error("API error {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Api {
        status: u16,
        detail: Option<String>,
        body: String,
    },

    /// Network or protocol failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the session failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Message to show the user: the server's `detail` when there is one,
    /// otherwise the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    /// HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from session storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error.
    #[error("session storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The session file exists but is not a JSON object of strings.
    #[error("session file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode session value: {0}")]
    Encode(#[from] serde_json::Error),
}
