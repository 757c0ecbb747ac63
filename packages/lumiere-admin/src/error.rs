//! Error types for admin controllers.

use lumiere_client::ClientError;
use thiserror::Error;

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    /// Request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response, with the server's `detail` message when it sent one
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Response did not match the resource's item shape
    #[error("Unexpected {resource} payload: {message}")]
    Decode {
        resource: &'static str,
        message: String,
    },

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    #[error("Unknown filter '{key}' for {resource}")]
    UnknownFilter { resource: &'static str, key: String },

    #[error("Invalid value for filter '{key}': {reason}")]
    InvalidFilter { key: String, reason: String },

    /// A mutation committed but the reload that followed it failed
    #[error("Change saved, but reloading the list failed: {0}")]
    ReloadFailed(Box<AdminError>),
}

impl AdminError {
    /// Whether the backend answered at all.
    pub fn is_http(&self) -> bool {
        matches!(self, AdminError::Http { .. })
    }

    /// Whether the requested change reached the backend before the error.
    pub fn is_committed(&self) -> bool {
        matches!(self, AdminError::ReloadFailed(_))
    }
}

impl From<ClientError> for AdminError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } => AdminError::Http { status, message },
            ClientError::Network(message) => AdminError::Network(message),
            ClientError::Config(message) => AdminError::Network(message),
            ClientError::Parse(message) => AdminError::Decode {
                resource: "response",
                message,
            },
        }
    }
}
