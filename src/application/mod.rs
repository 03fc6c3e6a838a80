//! Application layer: input validation, wire mapping, cached queries and the
//! create mutation.
//!
//! Everything here talks to the outside world through
//! [`GreetingRepository`](crate::repository::GreetingRepository) and to the
//! cache through [`QueryClient`](crate::query::QueryClient). Neither is a global;
//! both are handed in at construction.

pub mod dto;
pub mod error;
pub mod mapper;
pub mod mutation;
pub mod queries;
pub mod validation;

pub use error::GreetingError;
pub use mapper::GreetingMapper;
pub use mutation::{CreateGreetingMutation, MutationStatus};
pub use queries::{GreetingQueries, GreetingQueryClient, GreetingQueryData};
pub use validation::{validate_create_greeting, CreateGreetingInput, ValidationErrors};
