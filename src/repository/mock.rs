//! # Mock Repository & Testing Guide
//!
//! [`MockGreetingRepository`] implements [`GreetingRepository`] entirely in memory.
//! Queue the responses you want, hand the mock to the code under test as an
//! `Arc<dyn GreetingRepository>`, then check what was called.
//!
//! ## When to use the mock vs the HTTP adapter
//!
//! | Feature | MockGreetingRepository | HttpGreetingRepository |
//! |---------|------------------------|------------------------|
//! | **Speed** | Instant | Needs a server (e.g. `wiremock`) |
//! | **Determinism** | Calls can be held and released | Subject to the network |
//! | **Error Injection** | `return_err` | Requires server fixtures |
//!
//! ## Example
//!
//! ```rust
//! use greetings::application::dto::GreetingResponseDto;
//! use greetings::repository::mock::MockGreetingRepository;
//! use greetings::repository::{GreetingRepository, RepositoryError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockGreetingRepository::new();
//!     mock.expect_get_greeting_by_id("1").return_ok(GreetingResponseDto {
//!         id: Some("1".into()),
//!         message: "Hello".into(),
//!         timestamp: None,
//!     });
//!     mock.expect_list_greetings()
//!         .return_err(RepositoryError::Transport("connection reset".into()));
//!
//!     assert_eq!(mock.get_greeting_by_id("1").await.unwrap().message, "Hello");
//!     assert!(mock.list_greetings().await.is_err());
//!
//!     mock.verify(); // every queued response was consumed
//! }
//! ```
//!
//! ## Holding calls
//!
//! [`MockGreetingRepository::hold`] parks every call until
//! [`MockGreetingRepository::release`]. Combined with
//! [`MockGreetingRepository::wait_for_calls`] this lets a test observe what
//! happens while a fetch is still in flight.

use super::{GreetingRepository, RepositoryError};
use crate::application::dto::{CreateGreetingRequestDto, GreetingResponseDto};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// A call received by the mock, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCall {
    GetGreeting,
    GetGreetingById(String),
    CreateGreeting(CreateGreetingRequestDto),
    ListGreetings,
}

/// A queued response. Matched against calls of the same kind, oldest first.
enum Expectation {
    GetGreeting {
        response: Result<GreetingResponseDto, RepositoryError>,
    },
    GetGreetingById {
        id: String,
        response: Result<GreetingResponseDto, RepositoryError>,
    },
    CreateGreeting {
        response: Result<GreetingResponseDto, RepositoryError>,
    },
    ListGreetings {
        response: Result<Vec<GreetingResponseDto>, RepositoryError>,
    },
}

impl Expectation {
    fn matches(&self, call: &RepositoryCall) -> bool {
        match (self, call) {
            (Expectation::GetGreeting { .. }, RepositoryCall::GetGreeting) => true,
            (Expectation::GetGreetingById { id, .. }, RepositoryCall::GetGreetingById(called)) => {
                id == called
            }
            (Expectation::CreateGreeting { .. }, RepositoryCall::CreateGreeting(_)) => true,
            (Expectation::ListGreetings { .. }, RepositoryCall::ListGreetings) => true,
            _ => false,
        }
    }
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<RepositoryCall>,
    unexpected: Vec<RepositoryCall>,
}

/// An in-memory [`GreetingRepository`] with expectation tracking.
///
/// Cloning shares the queue, the call log and the gate.
#[derive(Clone)]
pub struct MockGreetingRepository {
    state: Arc<Mutex<MockState>>,
    gate: Arc<watch::Sender<bool>>,
    call_count: Arc<watch::Sender<usize>>,
}

impl Default for MockGreetingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGreetingRepository {
    /// Creates a mock with no expectations and an open gate.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            gate: Arc::new(watch::channel(true).0),
            call_count: Arc::new(watch::channel(0).0),
        }
    }

    /// Expects a `get_greeting` call.
    pub fn expect_get_greeting(&self) -> ExpectationBuilder<'_, GreetingResponseDto> {
        ExpectationBuilder {
            mock: self,
            make: Box::new(|response| Expectation::GetGreeting { response }),
        }
    }

    /// Expects a `get_greeting_by_id` call for `id`.
    pub fn expect_get_greeting_by_id(
        &self,
        id: impl Into<String>,
    ) -> ExpectationBuilder<'_, GreetingResponseDto> {
        let id = id.into();
        ExpectationBuilder {
            mock: self,
            make: Box::new(move |response| Expectation::GetGreetingById { id, response }),
        }
    }

    /// Expects a `create_greeting` call.
    pub fn expect_create_greeting(&self) -> ExpectationBuilder<'_, GreetingResponseDto> {
        ExpectationBuilder {
            mock: self,
            make: Box::new(|response| Expectation::CreateGreeting { response }),
        }
    }

    /// Expects a `list_greetings` call.
    pub fn expect_list_greetings(&self) -> ExpectationBuilder<'_, Vec<GreetingResponseDto>> {
        ExpectationBuilder {
            mock: self,
            make: Box::new(|response| Expectation::ListGreetings { response }),
        }
    }

    /// Parks every subsequent call until [`MockGreetingRepository::release`].
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    /// Lets parked and future calls proceed.
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    /// Resolves once at least `count` calls have been received.
    pub async fn wait_for_calls(&self, count: usize) {
        let mut rx = self.call_count.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|seen| *seen >= count).await;
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of received calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&RepositoryCall) -> bool) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| predicate(c))
            .count()
    }

    /// Panics if a queued response was never consumed or a call had no match.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.unexpected.is_empty() {
            panic!("Unexpected repository calls: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    fn push(&self, expectation: Expectation) {
        self.state.lock().unwrap().expectations.push_back(expectation);
    }

    /// Records `call`, waits for the gate and pops the matching expectation.
    async fn take(&self, call: RepositoryCall) -> Option<Expectation> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call.clone());
            let position = state.expectations.iter().position(|e| e.matches(&call));
            match position.and_then(|i| state.expectations.remove(i)) {
                Some(expectation) => Some(expectation),
                None => {
                    state.unexpected.push(call);
                    None
                }
            }
        };
        self.call_count.send_modify(|seen| *seen += 1);

        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;
        expectation
    }
}

fn unexpected(call: &str) -> RepositoryError {
    RepositoryError::Transport(format!("unexpected call to {call}"))
}

#[async_trait]
impl GreetingRepository for MockGreetingRepository {
    async fn get_greeting(&self) -> Result<GreetingResponseDto, RepositoryError> {
        match self.take(RepositoryCall::GetGreeting).await {
            Some(Expectation::GetGreeting { response }) => response,
            _ => Err(unexpected("get_greeting")),
        }
    }

    async fn get_greeting_by_id(&self, id: &str) -> Result<GreetingResponseDto, RepositoryError> {
        match self
            .take(RepositoryCall::GetGreetingById(id.to_string()))
            .await
        {
            Some(Expectation::GetGreetingById { response, .. }) => response,
            _ => Err(unexpected("get_greeting_by_id")),
        }
    }

    async fn create_greeting(
        &self,
        request: CreateGreetingRequestDto,
    ) -> Result<GreetingResponseDto, RepositoryError> {
        match self.take(RepositoryCall::CreateGreeting(request)).await {
            Some(Expectation::CreateGreeting { response }) => response,
            _ => Err(unexpected("create_greeting")),
        }
    }

    async fn list_greetings(&self) -> Result<Vec<GreetingResponseDto>, RepositoryError> {
        match self.take(RepositoryCall::ListGreetings).await {
            Some(Expectation::ListGreetings { response }) => response,
            _ => Err(unexpected("list_greetings")),
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<'a, T> {
    mock: &'a MockGreetingRepository,
    make: Box<dyn FnOnce(Result<T, RepositoryError>) -> Expectation + Send + 'a>,
}

impl<T> ExpectationBuilder<'_, T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        let expectation = (self.make)(Ok(value));
        self.mock.push(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: RepositoryError) {
        let expectation = (self.make)(Err(error));
        self.mock.push(expectation);
    }
}
