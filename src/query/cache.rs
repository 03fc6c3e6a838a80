//! # Query Cache Actor
//!
//! [`QueryCache`] owns every cache entry and processes [`CacheRequest`]s one at a
//! time. Fetches never run inside the loop: each one is spawned onto its own
//! task, which reports back with a `Resolve` message. While a fetch is in
//! flight, later reads of the same key are parked as waiters of that fetch
//! instead of starting another one.
//!
//! ## Generations
//!
//! Every entry carries a generation counter. Invalidation bumps it. A fetch
//! remembers the generation it started under, and its result is only memoized
//! if the entry is still on that generation when the result arrives. Waiters
//! always get the result they asked for.
//!
//! ## Abandoned fetches
//!
//! A reader that stops waiting drops its response receiver. When a fetch
//! resolves and none of its waiters are still listening, the result is
//! discarded and the entry is left untouched.
//!
//! ## Garbage collection
//!
//! An entry nobody has read for the cache's idle window, and that has no
//! fetch running or reader waiting, is evicted by a periodic sweep. Reading
//! the key again starts from scratch.

use super::client::QueryClient;
use super::error::QueryError;
use super::key::QueryKey;
use super::message::{CacheRequest, Fetcher, Response};
use super::state::{QueryState, QueryStatus};
use std::collections::HashMap;
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Idle window used by [`QueryCache::new`].
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(5 * 60);

const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(10);
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

struct Waiter<V, E> {
    generation: u64,
    respond_to: Response<V, E>,
}

struct QueryEntry<V, E> {
    status: QueryStatus,
    data: Option<V>,
    error: Option<E>,
    stale: bool,
    generation: u64,
    /// Generation of the fetch this entry is currently loading, if any.
    in_flight: Option<u64>,
    fetch_count: u64,
    waiters: Vec<Waiter<V, E>>,
    /// Last read or resolve of this key.
    last_used: Instant,
}

impl<V, E> QueryEntry<V, E> {
    fn new() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            stale: false,
            generation: 0,
            in_flight: None,
            fetch_count: 0,
            waiters: Vec::new(),
            last_used: Instant::now(),
        }
    }

    fn is_loading(&self) -> bool {
        self.in_flight == Some(self.generation)
    }

    /// Status of an entry with no current fetch, derived from what it holds.
    fn settled_status(&self) -> QueryStatus {
        match (&self.data, &self.error, self.stale) {
            (Some(_), _, false) => QueryStatus::Success,
            (None, Some(_), _) => QueryStatus::Error,
            _ => QueryStatus::Idle,
        }
    }

    /// `true` while a fetch is running or a reader still waits on one.
    fn is_active(&self) -> bool {
        self.in_flight.is_some() || self.waiters.iter().any(|w| !w.respond_to.is_closed())
    }
}

/// The cache task. Create with [`QueryCache::new`], then spawn [`QueryCache::run`].
pub struct QueryCache<V, E> {
    receiver: mpsc::Receiver<CacheRequest<V, E>>,
    /// Handed to fetch tasks so they can post `Resolve`. Weak, so the loop
    /// still ends once every client is gone.
    resolver: mpsc::WeakSender<CacheRequest<V, E>>,
    entries: HashMap<QueryKey, QueryEntry<V, E>>,
    /// Inactive entries unused for this long are evicted.
    gc_time: Duration,
}

impl<V, E> QueryCache<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Display + Send + 'static,
{
    /// A cache with the [`DEFAULT_GC_TIME`] idle window.
    pub fn new(buffer_size: usize) -> (Self, QueryClient<V, E>) {
        Self::with_gc_time(buffer_size, DEFAULT_GC_TIME)
    }

    /// A cache that evicts inactive entries after `gc_time` without a read.
    pub fn with_gc_time(buffer_size: usize, gc_time: Duration) -> (Self, QueryClient<V, E>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let cache = Self {
            receiver,
            resolver: sender.downgrade(),
            entries: HashMap::new(),
            gc_time,
        };
        (cache, QueryClient::new(sender))
    }

    /// Processes requests until every [`QueryClient`] is dropped and all
    /// in-flight fetches have reported back.
    pub async fn run(mut self) {
        info!(gc_time = ?self.gc_time, "Query cache started");

        let mut sweep = interval(self.gc_time.clamp(MIN_SWEEP_PERIOD, MAX_SWEEP_PERIOD));
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
                _ = sweep.tick() => self.collect_garbage(),
            }
        }

        info!(size = self.entries.len(), "Query cache shutdown");
    }

    fn handle(&mut self, msg: CacheRequest<V, E>) {
        match msg {
            CacheRequest::Fetch {
                key,
                fetcher,
                force,
                respond_to,
            } => self.handle_fetch(key, fetcher, force, respond_to),
            CacheRequest::Resolve {
                key,
                generation,
                result,
            } => self.handle_resolve(key, generation, result),
            CacheRequest::Invalidate { prefix, respond_to } => {
                let count = self.invalidate(&prefix);
                info!(%prefix, count, "Invalidated");
                let _ = respond_to.send(count);
            }
            CacheRequest::State { key, respond_to } => {
                let _ = respond_to.send(self.snapshot(&key));
            }
        }
    }

    fn handle_fetch(
        &mut self,
        key: QueryKey,
        fetcher: Fetcher<V, E>,
        force: bool,
        respond_to: Response<V, E>,
    ) {
        let entry = self.entries.entry(key.clone()).or_insert_with(QueryEntry::new);
        entry.last_used = Instant::now();

        if entry.is_loading() {
            debug!(%key, "Joined in-flight fetch");
            entry.waiters.push(Waiter {
                generation: entry.generation,
                respond_to,
            });
            return;
        }

        if !force && !entry.stale && entry.status == QueryStatus::Success {
            if let Some(data) = &entry.data {
                debug!(%key, "Cache hit");
                let _ = respond_to.send(Ok(data.clone()));
                return;
            }
        }

        let Some(resolver) = self.resolver.upgrade() else {
            warn!(%key, "Cache closing, fetch not started");
            let _ = respond_to.send(Err(QueryError::CacheClosed));
            return;
        };

        let generation = entry.generation;
        entry.status = QueryStatus::Loading;
        entry.in_flight = Some(generation);
        entry.fetch_count += 1;
        entry.waiters.push(Waiter {
            generation,
            respond_to,
        });
        debug!(%key, generation, force, "Fetch started");

        tokio::spawn(async move {
            let result = fetcher().await;
            let resolve = CacheRequest::Resolve {
                key,
                generation,
                result,
            };
            if resolver.send(resolve).await.is_err() {
                debug!("Cache gone before fetch resolved");
            }
        });
    }

    fn handle_resolve(&mut self, key: QueryKey, generation: u64, result: Result<V, E>) {
        let Some(entry) = self.entries.get_mut(&key) else {
            return;
        };

        entry.last_used = Instant::now();
        if entry.in_flight == Some(generation) {
            entry.in_flight = None;
        }
        let (mine, others): (Vec<_>, Vec<_>) = std::mem::take(&mut entry.waiters)
            .into_iter()
            .partition(|w| w.generation == generation);
        entry.waiters = others;

        let observers: Vec<_> = mine
            .into_iter()
            .filter(|w| !w.respond_to.is_closed())
            .collect();
        let current = generation == entry.generation;

        if observers.is_empty() {
            debug!(%key, generation, "No observers left, result discarded");
            if current {
                entry.status = entry.settled_status();
            }
            return;
        }

        if current {
            match &result {
                Ok(value) => {
                    entry.data = Some(value.clone());
                    entry.error = None;
                    entry.stale = false;
                    entry.status = QueryStatus::Success;
                    debug!(%key, observers = observers.len(), "Fetch succeeded");
                }
                Err(e) => {
                    entry.error = Some(e.clone());
                    entry.status = QueryStatus::Error;
                    warn!(%key, error = %e, "Fetch failed");
                }
            }
        } else {
            debug!(%key, generation, "Result outdated by invalidation, not memoized");
        }

        for waiter in observers {
            let reply = result.clone().map_err(QueryError::Fetch);
            let _ = waiter.respond_to.send(reply);
        }
    }

    fn invalidate(&mut self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for (key, entry) in self.entries.iter_mut() {
            if !key.starts_with(prefix) {
                continue;
            }
            entry.generation += 1;
            entry.stale = true;
            entry.status = entry.settled_status();
            count += 1;
        }
        count
    }

    /// Drops every inactive entry whose idle window has passed.
    fn collect_garbage(&mut self) {
        let gc_time = self.gc_time;
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            let keep = entry.is_active() || entry.last_used.elapsed() < gc_time;
            if !keep {
                debug!(%key, "Evicted idle entry");
            }
            keep
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, size = self.entries.len(), "Garbage collected");
        }
    }

    fn snapshot(&self, key: &QueryKey) -> Option<QueryState<V, E>> {
        self.entries.get(key).map(|entry| QueryState {
            status: entry.status,
            data: entry.data.clone(),
            error: entry.error.clone(),
            is_stale: entry.stale,
            fetch_count: entry.fetch_count,
            observers: entry
                .waiters
                .iter()
                .filter(|w| !w.respond_to.is_closed())
                .count(),
        })
    }
}
