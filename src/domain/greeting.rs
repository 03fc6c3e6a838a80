use super::error::InvalidGreeting;
use super::message::Message;
use chrono::{DateTime, Duration, Utc};
use std::hash::{Hash, Hasher};

/// Messages longer than this many characters count as long.
pub const LONG_MESSAGE_THRESHOLD: usize = 100;

/// Represents a greeting held by the remote service.
///
/// # Identity
/// Two greetings are equal when their ids match, whatever their message or
/// timestamps. Use [`Greeting::message`] to compare contents.
///
/// # Lifecycle
/// - [`Greeting::create`] for a brand new greeting.
/// - [`Greeting::restore`] to rehydrate one received from the wire.
/// - [`Greeting::update_message`] returns a new value; the receiver is untouched.
#[derive(Debug, Clone)]
pub struct Greeting {
    id: String,
    message: Message,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Greeting {
    /// Creates a greeting stamped with the current time.
    ///
    /// # Errors
    /// [`InvalidGreeting::EmptyId`] for a blank id, otherwise whatever
    /// [`Message::create`] rejects.
    pub fn create(id: impl Into<String>, raw_message: &str) -> Result<Self, InvalidGreeting> {
        let id = validate_id(id.into())?;
        let message = Message::create(raw_message)?;
        let now = Utc::now();
        Ok(Self {
            id,
            message,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a greeting from stored parts without deriving a new id.
    ///
    /// A missing id is an invariant violation. A missing timestamp rehydrates
    /// at the current time.
    pub fn restore(
        id: Option<&str>,
        raw_message: &str,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Self, InvalidGreeting> {
        let id = validate_id(id.unwrap_or_default().to_string())?;
        let message = Message::create(raw_message)?;
        let created_at = created_at.unwrap_or_else(Utc::now);
        Ok(Self {
            id,
            message,
            created_at,
            updated_at: created_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// `true` while the greeting is less than an hour old. Evaluated on every call.
    pub fn is_recent(&self) -> bool {
        self.is_recent_at(Utc::now())
    }

    /// Same rule as [`Greeting::is_recent`], measured against `now`.
    pub fn is_recent_at(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at < Duration::hours(1)
    }

    pub fn is_long_message(&self) -> bool {
        self.message.len() > LONG_MESSAGE_THRESHOLD
    }

    /// Returns a copy carrying `new_raw`, keeping id and creation time.
    ///
    /// # Errors
    /// Whatever [`Message::create`] rejects. The original greeting is unaffected.
    pub fn update_message(&self, new_raw: &str) -> Result<Self, InvalidGreeting> {
        let message = Message::create(new_raw)?;
        Ok(Self {
            id: self.id.clone(),
            message,
            created_at: self.created_at,
            updated_at: Utc::now().max(self.created_at),
        })
    }
}

impl PartialEq for Greeting {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Greeting {}

impl Hash for Greeting {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

fn validate_id(id: String) -> Result<String, InvalidGreeting> {
    if id.trim().is_empty() {
        return Err(InvalidGreeting::EmptyId);
    }
    Ok(id)
}
