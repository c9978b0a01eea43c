//! Errors raised while talking to a language server.

use callscope_tree::ModelError;
use thiserror::Error;

/// Errors that can occur during LSP communication.
#[derive(Debug, Error)]
pub enum LspClientError {
    /// Failed to spawn the language server process.
    #[error("failed to spawn language server: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Failed to communicate with the server.
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    /// Failed to serialize/deserialize JSON.
    #[error("JSON error: {0}")]
    Json(#[source] serde_json::Error),

    /// Server returned an error response.
    #[error("server error {code}: {message}")]
    ServerError {
        /// Error code from the server.
        code: i64,
        /// Error message from the server.
        message: String,
    },

    /// Client has not been initialised.
    #[error("client not initialised: call initialize() first")]
    NotInitialised,

    /// Too many messages arrived without the matching response.
    #[error("timeout waiting for response to request {0}")]
    ResponseTimeout(i64),
}

impl LspClientError {
    /// Creates an `Io` error for a malformed or truncated message stream.
    pub(crate) fn protocol(kind: std::io::ErrorKind, message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::new(kind, message.into()))
    }
}

impl From<LspClientError> for ModelError {
    fn from(error: LspClientError) -> Self {
        Self::provider("language server request failed", error)
    }
}
