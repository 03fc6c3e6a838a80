//! Input validation for the create-greeting form.
//!
//! Runs before any network access. Failures are reported per field so a caller
//! can show each message next to its input.

use crate::domain::MAX_MESSAGE_LENGTH;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raw user input, as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGreetingInput {
    pub message: String,
}

impl CreateGreetingInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Input that passed [`validate_create_greeting`]. The message is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreateGreeting {
    message: String,
}

impl ValidatedCreateGreeting {
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A single field failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every field failure found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages reported for `field`, in order.
    pub fn for_field(&self, field: &str) -> Vec<&'static str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message)
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Validation failed: {joined}")
    }
}

pub const EMPTY_MESSAGE: &str = "Message cannot be empty";
pub const MESSAGE_TOO_LONG: &str = "Message cannot exceed 200 characters";

/// Checks `input` against the creation schema: `message` is trimmed, then
/// must hold 1 to 200 characters.
pub fn validate_create_greeting(
    input: &CreateGreetingInput,
) -> Result<ValidatedCreateGreeting, ValidationErrors> {
    let message = input.message.trim();
    let length = message.chars().count();

    let mut errors = Vec::new();
    if length < 1 {
        errors.push(FieldError {
            field: "message",
            message: EMPTY_MESSAGE,
        });
    } else if length > MAX_MESSAGE_LENGTH {
        errors.push(FieldError {
            field: "message",
            message: MESSAGE_TOO_LONG,
        });
    }

    if !errors.is_empty() {
        return Err(ValidationErrors { errors });
    }

    Ok(ValidatedCreateGreeting {
        message: message.to_string(),
    })
}
