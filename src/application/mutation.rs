//! The create-greeting write path.

use super::error::GreetingError;
use super::mapper::GreetingMapper;
use super::queries::{GreetingQueries, GreetingQueryClient};
use super::validation::{validate_create_greeting, CreateGreetingInput};
use crate::domain::Greeting;
use crate::repository::GreetingRepository;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

/// Where the latest [`CreateGreetingMutation::mutate`] call stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success(Greeting),
    Error(GreetingError),
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationStatus::Pending)
    }
}

/// Validates input, creates the greeting remotely, then invalidates every
/// cached greeting read.
///
/// Clones share the same status channel.
#[derive(Clone)]
pub struct CreateGreetingMutation {
    repository: Arc<dyn GreetingRepository>,
    client: GreetingQueryClient,
    status: Arc<watch::Sender<MutationStatus>>,
}

impl CreateGreetingMutation {
    pub fn new(repository: Arc<dyn GreetingRepository>, client: GreetingQueryClient) -> Self {
        Self {
            repository,
            client,
            status: Arc::new(watch::channel(MutationStatus::Idle).0),
        }
    }

    /// Runs the pipeline for `input`.
    ///
    /// Invalid input fails before the repository is called. On success the
    /// returned future completes only after the cache has marked
    /// `["greetings"]` stale, so a read issued afterwards goes back to the
    /// service. Nothing is invalidated when any step fails.
    ///
    /// Once the service has accepted the greeting the call succeeds, even if
    /// the cache can no longer be reached to invalidate; that failure is
    /// only logged.
    pub async fn mutate(&self, input: CreateGreetingInput) -> Result<Greeting, GreetingError> {
        self.status.send_replace(MutationStatus::Pending);

        let result = self.run(&input).await;
        let settled = match &result {
            Ok(greeting) => MutationStatus::Success(greeting.clone()),
            Err(e) => MutationStatus::Error(e.clone()),
        };
        self.status.send_replace(settled);
        result
    }

    pub fn status(&self) -> MutationStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every status change from now on.
    pub fn subscribe(&self) -> watch::Receiver<MutationStatus> {
        self.status.subscribe()
    }

    /// Back to [`MutationStatus::Idle`], dropping the last result.
    pub fn reset(&self) {
        self.status.send_replace(MutationStatus::Idle);
    }

    async fn run(&self, input: &CreateGreetingInput) -> Result<Greeting, GreetingError> {
        let validated = validate_create_greeting(input)?;
        let request = GreetingMapper::to_create_request(&validated);
        let response = self.repository.create_greeting(request).await?;
        let greeting = GreetingMapper::to_domain(&response)?;
        if let Err(e) = self.client.invalidate(GreetingQueries::all()).await {
            warn!(id = greeting.id(), error = %e, "Greeting created but cache not invalidated");
        }
        Ok(greeting)
    }
}
