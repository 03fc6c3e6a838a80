//! Observable per-key query state.

/// Lifecycle of one key.
///
/// `Idle → Loading → Success | Error`. Invalidation sends a settled key back to
/// `Idle`; the next read moves it to `Loading` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of a key, as returned by [`QueryClient::state`](crate::query::QueryClient::state).
#[derive(Debug, Clone)]
pub struct QueryState<V, E> {
    pub status: QueryStatus,
    /// Last successful value. Kept after invalidation, with `is_stale` set.
    pub data: Option<V>,
    /// Error of the last failed fetch, cleared by the next success.
    pub error: Option<E>,
    pub is_stale: bool,
    /// Number of fetches started for this key.
    pub fetch_count: u64,
    /// Readers currently waiting on an in-flight fetch.
    pub observers: usize,
}
