#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Greetings
//!
//! > **A client-side bounded context for greetings, with a single-flight query cache.**
//!
//! This crate reads and creates greetings held by a remote HTTP service. Reads go
//! through a keyed cache that deduplicates concurrent requests and memoizes results
//! until a successful create invalidates them.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Invariants at construction
//! [`Message`](domain::Message) and [`Greeting`](domain::Greeting) can only be built
//! through smart constructors returning `Result`. Any value of these types is valid,
//! so nothing downstream re-checks them.
//!
//! ### Typed failures
//! Each layer has its own `thiserror` enum and converts the layer below with
//! `#[from]`. Errors are `Clone` so one fetch failure can be handed to every reader
//! waiting on it.
//!
//! ### Ports, not globals
//! The service is reached only through the
//! [`GreetingRepository`](repository::GreetingRepository) trait, passed in as
//! `Arc<dyn GreetingRepository>`. Tests swap in
//! [`MockGreetingRepository`](repository::mock::MockGreetingRepository).
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. The cache is an actor
//! [`QueryCache`](query::QueryCache) is a Tokio task that owns every entry and
//! handles requests one at a time, so its state needs no locks. Network fetches run
//! in spawned tasks and post their result back to the cache as a message.
//!
//! ### 2. Single-flight reads
//! A read of a key that is already loading joins the running fetch. Two concurrent
//! `detail(Some("1"))` calls produce one request to the service.
//!
//! ### 3. Invalidate after write
//! A successful create marks everything under `["greetings"]` stale before
//! returning, so the next list read fetches again.
//!
//! ### 4. Observability
//! The cache task and the HTTP adapter log through `tracing`. See
//! [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Domain ([`domain`])
//! - **Key items**: [`Message`](domain::Message), [`Greeting`](domain::Greeting),
//!   [`InvalidGreeting`](domain::InvalidGreeting).
//!
//! ### 2. The Application ([`application`])
//! Validation, DTO mapping, cached queries and the create mutation.
//! - **Key items**: [`GreetingQueries`](application::GreetingQueries),
//!   [`CreateGreetingMutation`](application::CreateGreetingMutation).
//!
//! ### 3. The Engine ([`query`])
//! The generic cache, independent of greetings.
//! - **Key items**: [`QueryCache`](query::QueryCache), [`QueryClient`](query::QueryClient),
//!   [`QueryKey`](query::QueryKey).
//!
//! ### 4. The Adapters ([`repository`], [`config`])
//! - **Key items**: [`HttpGreetingRepository`](repository::HttpGreetingRepository),
//!   [`ApiConfig`](config::ApiConfig).
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! - **Key items**: [`GreetingSystem`](lifecycle::GreetingSystem),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ## 🚀 Quick Start
//!
//! ```rust,no_run
//! use greetings::application::CreateGreetingInput;
//! use greetings::lifecycle::{setup_tracing, GreetingSystem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     setup_tracing()?;
//!
//!     // GREETINGS_API_BASE_URL, GREETINGS_API_TIMEOUT_MS, GREETINGS_MODE
//!     let system = GreetingSystem::from_env()?;
//!
//!     let created = system
//!         .create_greeting
//!         .mutate(CreateGreetingInput::new("Hello"))
//!         .await?;
//!     println!("created {}", created.id());
//!
//!     for greeting in system.queries.list().await? {
//!         println!("{}: {}", greeting.id(), greeting.message());
//!     }
//!
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod lifecycle;
pub mod query;
pub mod repository;
pub mod shared;
