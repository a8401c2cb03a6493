//! Error types for the YNC client

use thiserror::Error;

/// Errors that can occur while talking to a receiver
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or HTTP communication error
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// XML parsing error or unexpected response shape
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// Non-zero return code reported by the receiver
    #[error("Receiver fault: return code {0}")]
    Fault(u16),
}

/// Convenience Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
