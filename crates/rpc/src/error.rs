use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`crate::RpcClient::call`] and the [`crate::ExplorerClient`].
#[derive(Debug, Error)]
pub enum RpcError {
    /// The request did not complete within the configured timeout and was cancelled.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request failed at the transport level. `status` is set when the server answered
    /// with a non-success HTTP status.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status code, if a response was received.
        status: Option<u16>,
        /// Description of the failure.
        message: String,
    },

    /// The response envelope carried an `error` member.
    #[error("remote error: {message}")]
    Remote {
        /// The remote error message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// Short label used for logs and metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Transport { .. } => "transport",
            Self::Remote { .. } => "remote",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }

    /// The HTTP status of a transport failure, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::InvalidResponse(err.to_string());
        }
        Self::Transport { status: err.status().map(|s| s.as_u16()), message: err.to_string() }
    }
}
