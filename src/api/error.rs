//! Error taxonomy for backend calls and controller preconditions.

use thiserror::Error;

use crate::session::TokenStoreError;

/// Coarse classification every failure resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Client-side precondition failed; nothing was sent.
    InvalidArgument,
    /// No usable response: transport failure or timeout.
    Network,
    /// The server answered with an error or an unusable payload.
    Server,
    /// The referenced entity no longer exists on the server.
    NotFound,
    /// Local credential storage failed.
    Storage,
}

/// Errors surfaced by the remote client and the controllers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Precondition failure detected before any network call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport-level failure (DNS, connect, reset, TLS)
    #[error("Connection to '{endpoint}' failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Call exceeded the configured timeout
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },

    /// Non-2xx response, or a 2xx response flagged `success: false`
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// The server reported the referenced entity as missing
    #[error("Not found at '{endpoint}': {message}")]
    NotFound { endpoint: String, message: String },

    /// 2xx response whose body does not match the endpoint schema
    #[error("Malformed response from '{endpoint}': {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// Failed to read or write persisted credentials
    #[error("Token storage error: {0}")]
    Storage(#[from] TokenStoreError),

    /// HTTP client could not be constructed or a request could not be built
    #[error("HTTP error: {0}")]
    Http(String),
}

impl ApiError {
    /// Taxonomy bucket for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::InvalidArgument(_) => FailureKind::InvalidArgument,
            ApiError::Network { .. } | ApiError::Timeout { .. } | ApiError::Http(_) => {
                FailureKind::Network
            }
            ApiError::Server { .. } | ApiError::MalformedResponse { .. } => FailureKind::Server,
            ApiError::NotFound { .. } => FailureKind::NotFound,
            ApiError::Storage(_) => FailureKind::Storage,
        }
    }

    /// Stable machine-readable error type.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidArgument(_) => "invalid_argument",
            ApiError::Network { .. } => "network_error",
            ApiError::Timeout { .. } => "request_timeout",
            ApiError::Server { .. } => "server_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::MalformedResponse { .. } => "malformed_response",
            ApiError::Storage(_) => "storage_error",
            ApiError::Http(_) => "http_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Message suitable for showing to a user (toast, status line).
    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidArgument(message) => message.clone(),
            ApiError::Server { message, .. } | ApiError::NotFound { message, .. } => {
                message.clone()
            }
            ApiError::Network { .. } | ApiError::Http(_) => {
                "Network error, please check your connection".to_string()
            }
            ApiError::Timeout { .. } => "The server took too long to respond".to_string(),
            ApiError::MalformedResponse { .. } => {
                "The server sent an unexpected response".to_string()
            }
            ApiError::Storage(_) => "Could not access saved credentials".to_string(),
        }
    }
}
