//! Pure translations between wire records, user input and the domain.

use super::dto::{CreateGreetingRequestDto, GreetingResponseDto};
use super::validation::ValidatedCreateGreeting;
use crate::domain::{Greeting, InvalidGreeting};

/// Stateless mapper. Same input, same output.
pub struct GreetingMapper;

impl GreetingMapper {
    /// Response record to entity. Fails when the record breaks a domain invariant.
    pub fn to_domain(dto: &GreetingResponseDto) -> Result<Greeting, InvalidGreeting> {
        Greeting::try_from(dto)
    }

    /// Entity to response record. `updated_at` has no wire field and is dropped.
    pub fn to_response_dto(entity: &Greeting) -> GreetingResponseDto {
        GreetingResponseDto {
            id: Some(entity.id().to_string()),
            message: entity.message().as_str().to_string(),
            timestamp: Some(entity.created_at()),
        }
    }

    /// Validated user input to the create payload.
    pub fn to_create_request(input: &ValidatedCreateGreeting) -> CreateGreetingRequestDto {
        CreateGreetingRequestDto {
            message: input.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::validation::{validate_create_greeting, CreateGreetingInput};
    use chrono::{Duration, Utc};

    #[test]
    fn test_round_trip_preserves_id_message_and_creation_time() {
        let greeting = Greeting::restore(
            Some("g-1"),
            "Hello",
            Some(Utc::now() - Duration::minutes(30)),
        )
        .unwrap();

        let back = GreetingMapper::to_domain(&GreetingMapper::to_response_dto(&greeting)).unwrap();

        assert_eq!(back.id(), greeting.id());
        assert_eq!(back.message(), greeting.message());
        assert_eq!(back.created_at(), greeting.created_at());
    }

    #[test]
    fn test_to_domain_propagates_invariant_failure() {
        let dto = GreetingResponseDto {
            id: Some("g-1".into()),
            message: "x".repeat(201),
            timestamp: None,
        };
        assert_eq!(
            GreetingMapper::to_domain(&dto),
            Err(InvalidGreeting::MessageTooLong)
        );
    }

    #[test]
    fn test_to_create_request_uses_trimmed_message() {
        let validated = validate_create_greeting(&CreateGreetingInput::new(" Hi ")).unwrap();
        let request = GreetingMapper::to_create_request(&validated);
        assert_eq!(request, CreateGreetingRequestDto { message: "Hi".into() });
        assert_eq!(GreetingMapper::to_create_request(&validated), request);
    }
}
