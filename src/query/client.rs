//! Handle for talking to a running [`QueryCache`](crate::query::QueryCache).

use super::error::QueryError;
use super::key::QueryKey;
use super::message::{CacheRequest, Fetcher};
use super::state::QueryState;
use futures::FutureExt;
use std::future::Future;
use tokio::sync::{mpsc, oneshot};

/// Cheap to clone. The cache task stops once every clone is dropped.
pub struct QueryClient<V, E> {
    sender: mpsc::Sender<CacheRequest<V, E>>,
}

impl<V, E> Clone for QueryClient<V, E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<V, E> QueryClient<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    pub fn new(sender: mpsc::Sender<CacheRequest<V, E>>) -> Self {
        Self { sender }
    }

    /// Returns the memoized value for `key`, or runs `fetcher` to load it.
    ///
    /// If a fetch for `key` is already running, waits for that one instead and
    /// `fetcher` is never called. Dropping the returned future before it
    /// completes stops waiting; if nobody else is waiting, the eventual result
    /// is thrown away.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<V, QueryError<E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        self.request(key, boxed(fetcher), false).await
    }

    /// Like [`QueryClient::fetch`], but ignores a memoized value.
    pub async fn refetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<V, QueryError<E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        self.request(key, boxed(fetcher), true).await
    }

    /// Marks every key starting with `prefix` stale. Returns how many keys matched.
    ///
    /// Completes once the cache has applied the invalidation, so any read
    /// issued afterwards starts a new fetch.
    pub async fn invalidate(&self, prefix: QueryKey) -> Result<usize, QueryError<E>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Invalidate { prefix, respond_to })
            .await
            .map_err(|_| QueryError::CacheClosed)?;
        response.await.map_err(|_| QueryError::CacheDropped)
    }

    /// Snapshot of `key`, or `None` if it was never read.
    pub async fn state(&self, key: QueryKey) -> Result<Option<QueryState<V, E>>, QueryError<E>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::State { key, respond_to })
            .await
            .map_err(|_| QueryError::CacheClosed)?;
        response.await.map_err(|_| QueryError::CacheDropped)
    }

    async fn request(
        &self,
        key: QueryKey,
        fetcher: Fetcher<V, E>,
        force: bool,
    ) -> Result<V, QueryError<E>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Fetch {
                key,
                fetcher,
                force,
                respond_to,
            })
            .await
            .map_err(|_| QueryError::CacheClosed)?;
        response.await.map_err(|_| QueryError::CacheDropped)?
    }
}

fn boxed<V, E, F, Fut>(fetcher: F) -> Fetcher<V, E>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
{
    Box::new(move || fetcher().boxed())
}
