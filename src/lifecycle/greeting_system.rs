use crate::application::{CreateGreetingMutation, GreetingQueries};
use crate::config::{ApiConfig, ConfigError};
use crate::query::{QueryCache, DEFAULT_GC_TIME};
use crate::repository::{GreetingRepository, HttpGreetingRepository, RepositoryError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Request buffer of the query cache task.
const CACHE_BUFFER: usize = 32;

/// Errors raised while building or stopping a [`GreetingSystem`].
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Query cache task failed: {0}")]
    TaskFailed(String),
}

/// Wires the greetings context together.
///
/// `GreetingSystem` is responsible for:
/// - **Lifecycle Management**: starting the query cache task and stopping it again
/// - **Dependency Wiring**: handing one repository and one cache client to both
///   the read side and the write side
///
/// # Example
///
/// ```rust
/// use greetings::application::CreateGreetingInput;
/// use greetings::application::dto::GreetingResponseDto;
/// use greetings::lifecycle::GreetingSystem;
/// use greetings::repository::mock::MockGreetingRepository;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let mock = MockGreetingRepository::new();
///     mock.expect_create_greeting().return_ok(GreetingResponseDto {
///         id: Some("1".into()),
///         message: "Hello".into(),
///         timestamp: None,
///     });
///
///     let system = GreetingSystem::new(Arc::new(mock));
///     let greeting = system
///         .create_greeting
///         .mutate(CreateGreetingInput::new("Hello"))
///         .await
///         .unwrap();
///     assert_eq!(greeting.id(), "1");
///
///     system.shutdown().await.unwrap();
/// }
/// ```
pub struct GreetingSystem {
    /// Cached reads
    pub queries: GreetingQueries,

    /// The create-greeting write path
    pub create_greeting: CreateGreetingMutation,

    handle: tokio::task::JoinHandle<()>,
}

impl GreetingSystem {
    /// Spawns the query cache and builds queries and the mutation around
    /// `repository`. Must be called inside a Tokio runtime.
    pub fn new(repository: Arc<dyn GreetingRepository>) -> Self {
        Self::with_gc_time(repository, DEFAULT_GC_TIME)
    }

    /// Like [`GreetingSystem::new`], evicting cache entries left unread for `gc_time`.
    pub fn with_gc_time(repository: Arc<dyn GreetingRepository>, gc_time: Duration) -> Self {
        let (cache, client) = QueryCache::with_gc_time(CACHE_BUFFER, gc_time);
        let handle = tokio::spawn(cache.run());

        Self {
            queries: GreetingQueries::new(Arc::clone(&repository), client.clone()),
            create_greeting: CreateGreetingMutation::new(repository, client),
            handle,
        }
    }

    /// Same as [`GreetingSystem::new`] with an [`HttpGreetingRepository`]
    /// built from `config`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, SystemError> {
        let repository = HttpGreetingRepository::new(config)?;
        info!(base_url = %config.base_url, mode = ?config.mode, "Using HTTP repository");
        Ok(Self::with_gc_time(Arc::new(repository), config.cache_gc_time))
    }

    /// Reads [`ApiConfig::from_env`] and calls [`GreetingSystem::from_config`].
    pub fn from_env() -> Result<Self, SystemError> {
        let config = ApiConfig::from_env()?;
        Self::from_config(&config)
    }

    /// Drops the system's cache clients and waits for the cache task to end.
    ///
    /// The task only ends once every client is gone, so clones of `queries`
    /// or `create_greeting` held elsewhere must be dropped first. In-flight
    /// fetches are allowed to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down greeting system");

        drop(self.queries);
        drop(self.create_greeting);

        if let Err(e) = self.handle.await {
            error!(error = %e, "Query cache task failed");
            return Err(SystemError::TaskFailed(e.to_string()));
        }

        info!("Greeting system shutdown complete");
        Ok(())
    }
}
