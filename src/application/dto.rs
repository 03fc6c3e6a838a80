//! Wire records exchanged with the greetings service.

use crate::domain::{Greeting, InvalidGreeting};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A greeting as the service returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingResponseDto {
    /// Sent as a string or an integer; integers are kept in decimal form.
    #[serde(
        default,
        deserialize_with = "string_or_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

fn string_or_integer<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<WireId>::deserialize(deserializer)?;
    Ok(id.map(|id| match id {
        WireId::Text(text) => text,
        WireId::Unsigned(n) => n.to_string(),
        WireId::Signed(n) => n.to_string(),
    }))
}

/// Payload for creating a greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGreetingRequestDto {
    pub message: String,
}

/// Rehydrates a [`Greeting`] from the wire. The id is taken as-is, never generated.
impl TryFrom<&GreetingResponseDto> for Greeting {
    type Error = InvalidGreeting;

    fn try_from(dto: &GreetingResponseDto) -> Result<Self, Self::Error> {
        Greeting::restore(dto.id.as_deref(), &dto.message, dto.timestamp)
    }
}
