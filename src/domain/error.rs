//! Error types for the Greeting domain.

use thiserror::Error;

/// Raised when a [`Message`](super::Message) or [`Greeting`](super::Greeting)
/// would be built in violation of its invariants.
///
/// This is a hard construction failure. Retrying with the same input fails the
/// same way.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidGreeting {
    /// The message is empty after trimming.
    #[error("Message cannot be empty")]
    EmptyMessage,

    /// The trimmed message is longer than [`MAX_MESSAGE_LENGTH`](super::MAX_MESSAGE_LENGTH).
    #[error("Message cannot exceed 200 characters")]
    MessageTooLong,

    /// The identifier is missing, empty or only whitespace.
    #[error("Greeting id cannot be empty")]
    EmptyId,
}
