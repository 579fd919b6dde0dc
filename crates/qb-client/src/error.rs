//! Error types for the client.

use thiserror::Error;

use qb_core::ValidationError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the API or the session store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server refused the credentials or token.
    #[error("unauthorized: log in again")]
    Unauthorized,

    /// The server rejected the request as invalid.
    #[error("rejected by server ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The server failed for reasons of its own.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The stored access token is malformed.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// No access token is stored.
    #[error("not logged in")]
    NotLoggedIn,

    /// No character has been selected.
    #[error("no character selected")]
    NoCharacterSelected,

    /// The status screen has no character loaded.
    #[error("no character loaded")]
    NotLoaded,

    /// A status commit failed; the pending allocation is unchanged.
    #[error("change not applied: {0}")]
    NotApplied(Box<ClientError>),

    /// Client configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Session file could not be read or written.
    #[error("session store: {0}")]
    Io(#[from] std::io::Error),

    /// Session file is not valid JSON.
    #[error("session store: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl ClientError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| format!("HTTP {status}"));
        match status {
            401 | 403 => ClientError::Unauthorized,
            404 => ClientError::NotFound(message),
            400 | 409 | 422 => ClientError::Rejected { status, message },
            _ => ClientError::Server { status, message },
        }
    }
}

/// Pull a human-readable message out of an error body. Accepts
/// `{"message": "..."}`, `{"message": ["...", ...]}`, or plain text.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return Some(trimmed.to_string());
    };

    match value.get("message") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => value
            .get("error")
            .and_then(|e| e.as_str())
            .map(str::to_string),
    }
}
