//! Gateway error types

use thiserror::Error;

/// Errors that can occur while forwarding a request to the backend
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The backend URL could not be built
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// The credential cannot be sent as a header value
    #[error("Invalid authorization header")]
    InvalidCredential,

    /// No response was received (connection, TLS, timeout)
    #[error("Backend unreachable: {0}")]
    Transport(String),

    /// The backend body could not be read or was not JSON
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    /// The outgoing body could not be serialized
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest_middleware::Error> for GatewayError {
    fn from(error: reqwest_middleware::Error) -> Self {
        Self::Transport(error.to_string())
    }
}
