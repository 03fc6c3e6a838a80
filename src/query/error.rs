//! # Query Errors
//!
//! Failures of the cache plumbing itself, plus a wrapper carrying the fetch
//! error so one failure can be handed to every waiter of a key.

/// Errors returned by [`QueryClient`](crate::query::QueryClient).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError<E> {
    #[error("Query cache closed")]
    CacheClosed,
    #[error("Query cache dropped response channel")]
    CacheDropped,
    #[error("Fetch failed: {0}")]
    Fetch(E),
}
