//! Error types for the LUMIÈRE client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Message used when an error response carries no readable `detail`.
pub const FALLBACK_MESSAGE: &str = "An error occurred";

/// LUMIÈRE client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error (malformed base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

/// Pull the `detail` message out of an error body.
///
/// FastAPI validation errors carry `detail` as an array of objects, in which
/// case the first entry's `msg` is used.
pub fn detail_message(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return FALLBACK_MESSAGE.to_string(),
    };

    match value.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(serde_json::Value::Array(entries)) => entries
            .first()
            .and_then(|e| e.get("msg"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}
