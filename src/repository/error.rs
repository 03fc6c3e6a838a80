//! Error types for repository adapters.

use thiserror::Error;

/// Failures raised while talking to the greetings service.
///
/// Queries and the mutation surface these unchanged; nothing in this crate
/// retries them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// The request never produced a response (connect, timeout, I/O).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The requested greeting does not exist.
    #[error("Greeting not found: {0}")]
    NotFound(String),

    /// The service refused the payload.
    #[error("Greeting rejected by server: {0}")]
    Rejected(String),

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the wire shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}
