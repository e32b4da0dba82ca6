// ⚠️ Errors - backend client and local stores

/// Generic alert body when the backend gives no message
pub const GENERIC_FAILURE: &str = "Não foi possível completar a operação";

/// Errors from the banking REST backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, timeout, refused).
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("{endpoint} returned {status}: {}", .message.as_deref().unwrap_or(.body))]
    Api {
        endpoint: String,
        status: u16,
        /// `message` field of the JSON error body, when present
        message: Option<String>,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// A bearer-authorized call was attempted without a token.
    #[error("no session token for {endpoint}")]
    Unauthenticated { endpoint: String },
}

impl ApiError {
    /// Human-readable message sent by the backend, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Text to show the user: the backend's message verbatim, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the persistent flag store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("flag store: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("flag store directory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
