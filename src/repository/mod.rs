//! The repository port and its adapters.
//!
//! [`GreetingRepository`] is the only way the application layer reaches the
//! remote service. It is passed in explicitly as `Arc<dyn GreetingRepository>`,
//! so tests substitute [`mock::MockGreetingRepository`] without touching wiring.
//!
//! - [`http::HttpGreetingRepository`] is the production adapter.
//! - [`mock`] provides an expectation-driven double.

pub mod error;
pub mod http;
pub mod mock;

pub use error::RepositoryError;
pub use http::HttpGreetingRepository;

use crate::application::dto::{CreateGreetingRequestDto, GreetingResponseDto};
use async_trait::async_trait;

/// Remote access to greetings. Implementations hold no domain state.
#[async_trait]
pub trait GreetingRepository: Send + Sync {
    /// The current greeting. The service may omit its id.
    async fn get_greeting(&self) -> Result<GreetingResponseDto, RepositoryError>;

    async fn get_greeting_by_id(&self, id: &str) -> Result<GreetingResponseDto, RepositoryError>;

    async fn create_greeting(
        &self,
        request: CreateGreetingRequestDto,
    ) -> Result<GreetingResponseDto, RepositoryError>;

    async fn list_greetings(&self) -> Result<Vec<GreetingResponseDto>, RepositoryError>;
}
