//! Cached reads of greetings.
//!
//! Keys live under one root so a single invalidation refreshes everything:
//!
//! ```text
//! ["greetings"]
//! ├── ["greetings","list"]
//! └── ["greetings","detail"]
//!     ├── ["greetings","detail","42"]
//!     └── ["greetings","detail",undefined]   current greeting
//! ```

use super::error::GreetingError;
use super::mapper::GreetingMapper;
use crate::domain::Greeting;
use crate::query::{QueryClient, QueryKey, QueryState};
use crate::repository::GreetingRepository;
use std::sync::Arc;

/// Values stored in the greeting cache, one variant per key family.
#[derive(Debug, Clone, PartialEq)]
pub enum GreetingQueryData {
    List(Vec<Greeting>),
    Detail(Greeting),
}

pub type GreetingQueryClient = QueryClient<GreetingQueryData, GreetingError>;

/// Read side of the greetings context. Cheap to clone.
#[derive(Clone)]
pub struct GreetingQueries {
    repository: Arc<dyn GreetingRepository>,
    client: GreetingQueryClient,
}

impl GreetingQueries {
    pub fn new(repository: Arc<dyn GreetingRepository>, client: GreetingQueryClient) -> Self {
        Self { repository, client }
    }

    /// `["greetings"]`
    pub fn all() -> QueryKey {
        QueryKey::root("greetings")
    }

    /// `["greetings","list"]`
    pub fn lists() -> QueryKey {
        Self::all().child("list")
    }

    /// `["greetings","detail"]`
    pub fn details() -> QueryKey {
        Self::all().child("detail")
    }

    /// `["greetings","detail",id]`, with `undefined` for the current greeting.
    pub fn detail_key(id: Option<&str>) -> QueryKey {
        Self::details().child(id)
    }

    /// Every greeting, mapped to entities. Fails if any record is malformed.
    pub async fn list(&self) -> Result<Vec<Greeting>, GreetingError> {
        let data = self.client.fetch(Self::lists(), self.list_fetcher()).await?;
        Self::expect_list(data)
    }

    /// Reloads the list even if a memoized value exists.
    pub async fn refetch_list(&self) -> Result<Vec<Greeting>, GreetingError> {
        let data = self.client.refetch(Self::lists(), self.list_fetcher()).await?;
        Self::expect_list(data)
    }

    /// One greeting by id, or the current greeting when `id` is `None`.
    pub async fn detail(&self, id: Option<&str>) -> Result<Greeting, GreetingError> {
        let key = Self::detail_key(id);
        let data = self
            .client
            .fetch(key.clone(), self.detail_fetcher(id))
            .await?;
        Self::expect_detail(key, data)
    }

    pub async fn refetch_detail(&self, id: Option<&str>) -> Result<Greeting, GreetingError> {
        let key = Self::detail_key(id);
        let data = self
            .client
            .refetch(key.clone(), self.detail_fetcher(id))
            .await?;
        Self::expect_detail(key, data)
    }

    /// Marks every greeting entry stale. Returns the number of entries hit.
    pub async fn invalidate_all(&self) -> Result<usize, GreetingError> {
        Ok(self.client.invalidate(Self::all()).await?)
    }

    /// Snapshot of one cache entry, `None` if it was never read.
    pub async fn state(
        &self,
        key: QueryKey,
    ) -> Result<Option<QueryState<GreetingQueryData, GreetingError>>, GreetingError> {
        Ok(self.client.state(key).await?)
    }

    fn list_fetcher(
        &self,
    ) -> impl FnOnce() -> futures::future::BoxFuture<'static, Result<GreetingQueryData, GreetingError>>
           + Send
           + 'static {
        let repository = Arc::clone(&self.repository);
        move || {
            Box::pin(async move {
                let records = repository.list_greetings().await?;
                let greetings = records
                    .iter()
                    .map(GreetingMapper::to_domain)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, GreetingError>(GreetingQueryData::List(greetings))
            })
        }
    }

    fn detail_fetcher(
        &self,
        id: Option<&str>,
    ) -> impl FnOnce() -> futures::future::BoxFuture<'static, Result<GreetingQueryData, GreetingError>>
           + Send
           + 'static {
        let repository = Arc::clone(&self.repository);
        let id = id.map(str::to_string);
        move || {
            Box::pin(async move {
                let record = match id {
                    Some(id) => repository.get_greeting_by_id(&id).await?,
                    None => repository.get_greeting().await?,
                };
                let greeting = GreetingMapper::to_domain(&record)?;
                Ok::<_, GreetingError>(GreetingQueryData::Detail(greeting))
            })
        }
    }

    fn expect_list(data: GreetingQueryData) -> Result<Vec<Greeting>, GreetingError> {
        match data {
            GreetingQueryData::List(greetings) => Ok(greetings),
            GreetingQueryData::Detail(_) => Err(GreetingError::UnexpectedPayload(Self::lists())),
        }
    }

    fn expect_detail(key: QueryKey, data: GreetingQueryData) -> Result<Greeting, GreetingError> {
        match data {
            GreetingQueryData::Detail(greeting) => Ok(greeting),
            GreetingQueryData::List(_) => Err(GreetingError::UnexpectedPayload(key)),
        }
    }
}
