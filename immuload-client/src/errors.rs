//! Client error types

/// Error type for remote service operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to connect to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("{method} failed: {status}")]
    Rpc {
        method: &'static str,
        status: tonic::Status,
    },

    #[error("Token cannot be sent as request metadata: {0}")]
    InvalidToken(String),

    #[error("Connection already released")]
    Disconnected,
}

impl ClientError {
    /// gRPC status code, when the failure came back from the service
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            ClientError::Rpc { status, .. } => Some(status.code()),
            _ => None,
        }
    }
}
