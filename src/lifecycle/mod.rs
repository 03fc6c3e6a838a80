//! Runtime wiring and observability.
//!
//! - [`GreetingSystem`] starts the query cache and connects it to a repository
//! - [`setup_tracing`] initializes logging

pub mod greeting_system;
pub mod tracing;

pub use self::greeting_system::{GreetingSystem, SystemError};
pub use self::tracing::setup_tracing;
