//! # Cache Messages
//!
//! Requests exchanged between [`QueryClient`](crate::query::QueryClient) and the
//! [`QueryCache`](crate::query::QueryCache) task. Results of spawned fetches come
//! back through the same channel, so every change to cache state happens inside
//! the cache task, one message at a time.

use super::error::QueryError;
use super::key::QueryKey;
use super::state::QueryState;
use futures::future::BoxFuture;
use tokio::sync::oneshot;

/// Produces the future that loads a key. Called at most once, and only when
/// the cache decides a network fetch is needed.
pub type Fetcher<V, E> = Box<dyn FnOnce() -> BoxFuture<'static, Result<V, E>> + Send>;

/// One-shot channel carrying a read result back to its caller.
pub type Response<V, E> = oneshot::Sender<Result<V, QueryError<E>>>;

pub enum CacheRequest<V, E> {
    /// Read `key`. With `force`, skip a fresh memoized value.
    Fetch {
        key: QueryKey,
        fetcher: Fetcher<V, E>,
        force: bool,
        respond_to: Response<V, E>,
    },
    /// Sent by a spawned fetch task when its future completes.
    Resolve {
        key: QueryKey,
        generation: u64,
        result: Result<V, E>,
    },
    /// Mark every key under `prefix` stale. Replies with the number of keys hit.
    Invalidate {
        prefix: QueryKey,
        respond_to: oneshot::Sender<usize>,
    },
    State {
        key: QueryKey,
        respond_to: oneshot::Sender<Option<QueryState<V, E>>>,
    },
}
