use super::error::InvalidGreeting;
use std::fmt;

/// Upper bound on the trimmed message length, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 200;

/// The text of a greeting.
///
/// # Invariants
/// - Stored trimmed; never the raw input.
/// - Between 1 and [`MAX_MESSAGE_LENGTH`] characters.
///
/// There is no public way to build a `Message` other than [`Message::create`],
/// so every instance in the program satisfies both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    value: String,
}

impl Message {
    /// Validates and normalizes `raw`.
    ///
    /// # Errors
    /// - [`InvalidGreeting::EmptyMessage`] when nothing is left after trimming.
    /// - [`InvalidGreeting::MessageTooLong`] when the trimmed text exceeds 200 characters.
    pub fn create(raw: impl AsRef<str>) -> Result<Self, InvalidGreeting> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();

        if length == 0 {
            return Err(InvalidGreeting::EmptyMessage);
        }
        if length > MAX_MESSAGE_LENGTH {
            return Err(InvalidGreeting::MessageTooLong);
        }

        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Always `false` for a constructed message; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Case-insensitive substring search.
    pub fn contains(&self, needle: &str) -> bool {
        self.value.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Message {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_create_hello() {
        let message = Message::create("Hello").unwrap();
        assert_eq!(message.as_str(), "Hello");
    }

    #[test]
    fn test_create_stores_trimmed_value() {
        let message = Message::create("  Hello there \n").unwrap();
        assert_eq!(message.as_str(), "Hello there");
        assert_eq!(message.len(), 11);
        assert!(!message.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_create_rejects_blank(#[case] raw: &str) {
        let err = Message::create(raw).unwrap_err();
        assert_eq!(err, InvalidGreeting::EmptyMessage);
        assert_eq!(err.to_string(), "Message cannot be empty");
    }

    #[test]
    fn test_create_rejects_201_characters() {
        let err = Message::create("x".repeat(201)).unwrap_err();
        assert_eq!(err, InvalidGreeting::MessageTooLong);
        assert_eq!(err.to_string(), "Message cannot exceed 200 characters");
    }

    #[test]
    fn test_create_accepts_200_characters_with_padding() {
        let raw = format!("   {}   ", "x".repeat(200));
        let message = Message::create(raw).unwrap();
        assert_eq!(message.len(), 200);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let message = Message::create("é".repeat(200)).unwrap();
        assert_eq!(message.len(), 200);
    }

    #[rstest]
    #[case("hello", true)]
    #[case("WORLD", true)]
    #[case("lo wo", true)]
    #[case("bye", false)]
    fn test_contains_ignores_case(#[case] needle: &str, #[case] expected: bool) {
        let message = Message::create("Hello World").unwrap();
        assert_eq!(message.contains(needle), expected);
    }

    #[test]
    fn test_equality_by_value() {
        assert_eq!(Message::create(" Hi ").unwrap(), Message::create("Hi").unwrap());
        assert_ne!(Message::create("Hi").unwrap(), Message::create("hi").unwrap());
    }

    proptest! {
        #[test]
        fn prop_valid_input_is_stored_trimmed(s in "[ \t]{0,3}[a-zA-Z0-9][a-zA-Z0-9 ]{0,190}[ \t]{0,3}") {
            let message = Message::create(&s).unwrap();
            prop_assert_eq!(message.as_str(), s.trim());
        }

        #[test]
        fn prop_blank_input_is_rejected(s in "[ \t\r\n]{0,20}") {
            prop_assert_eq!(Message::create(&s), Err(InvalidGreeting::EmptyMessage));
        }

        #[test]
        fn prop_overlong_input_is_rejected(s in "[a-z]{201,260}") {
            prop_assert_eq!(Message::create(&s), Err(InvalidGreeting::MessageTooLong));
        }
    }
}
