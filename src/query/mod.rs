//! # Query Cache
//!
//! A keyed, single-flight cache for asynchronous reads.
//!
//! - Reads of a key are memoized until the key is invalidated.
//! - Concurrent reads of one key share a single in-flight fetch.
//! - Invalidation works on key prefixes and keeps the old value around as stale.
//! - Entries left unread for the idle window are evicted.
//!
//! The cache is an actor: [`QueryCache`] is the task that owns all state and
//! [`QueryClient`] is the cloneable handle used to talk to it.
//!
//! ```rust
//! use greetings::query::{QueryCache, QueryKey};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (cache, client) = QueryCache::<String, String>::new(32);
//!     tokio::spawn(cache.run());
//!
//!     let key = QueryKey::root("greetings").child("list");
//!     let value = client
//!         .fetch(key.clone(), || async { Ok("hello".to_string()) })
//!         .await
//!         .unwrap();
//!     assert_eq!(value, "hello");
//!
//!     // Served from memory, the new fetcher is not called.
//!     let again = client
//!         .fetch(key, || async { Ok("ignored".to_string()) })
//!         .await
//!         .unwrap();
//!     assert_eq!(again, "hello");
//! }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod key;
pub mod message;
pub mod state;

pub use cache::{QueryCache, DEFAULT_GC_TIME};
pub use client::QueryClient;
pub use error::QueryError;
pub use key::{KeyPart, QueryKey};
pub use state::{QueryState, QueryStatus};
