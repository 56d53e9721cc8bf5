use thiserror::Error;

/// Failure of a single request, tagged with the RPC method that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    #[error("{method} failed with code {code}: {message}")]
    Node {
        method: String,
        code: i64,
        message: String,
    },

    #[error("{method} transport error: {message}")]
    Transport { method: String, message: String },

    #[error("{method} returned an invalid response: {message}")]
    InvalidResponse { method: String, message: String },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl RpcError {
    /// The RPC method the failed request was for, if any.
    pub fn method(&self) -> Option<&str> {
        match self {
            RpcError::Node { method, .. }
            | RpcError::Transport { method, .. }
            | RpcError::InvalidResponse { method, .. } => Some(method),
            RpcError::Config(_) => None,
        }
    }

    /// The node-reported error code, if the node answered with an error.
    pub fn code(&self) -> Option<i64> {
        match self {
            RpcError::Node { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Error raised by a [`Transport`](crate::transport::Transport) before any
/// response body could be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}
