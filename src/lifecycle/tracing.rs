//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. The library never installs a subscriber on its own; binaries and
//! tests call this once at startup.
//!
//! ## What Gets Traced
//!
//! - **Cache lifecycle**: start and shutdown of the query cache task (`info`)
//! - **Reads**: fetch started, joined in flight, served from memory (`debug`)
//! - **Invalidation**: prefix and number of entries hit (`info`)
//! - **Eviction**: entries dropped by the idle sweep (`debug`)
//! - **Failures**: fetch errors (`warn`), HTTP error responses (`error`)
//! - **HTTP requests**: `HTTP GET` / `HTTP POST` with the url, then `HTTP response`
//!   with status and url (`debug`)
//! - **Writes**: a created greeting whose cache invalidation failed (`warn`)
//!
//! The domain layer emits nothing.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Invalidations and errors only
//! RUST_LOG=info cargo test
//!
//! # Every cache decision and request
//! RUST_LOG=debug cargo test
//!
//! # Just the HTTP adapter
//! RUST_LOG=greetings::repository=debug cargo test
//! ```
//!
//! ## Workflow Trace Example
//!
//! A list read, a create, and the list read that follows it:
//!
//! ```text
//! INFO Query cache started gc_time=300s
//! DEBUG Fetch started key=["greetings","list"] generation=0 force=false
//! DEBUG HTTP GET url=http://localhost:3000/api/v2/greetings
//! DEBUG HTTP response status=200 url=http://localhost:3000/api/v2/greetings
//! DEBUG Fetch succeeded key=["greetings","list"] observers=1
//! DEBUG HTTP POST url=http://localhost:3000/api/v2/greetings
//! DEBUG HTTP response status=201 url=http://localhost:3000/api/v2/greetings
//! INFO Invalidated prefix=["greetings"] count=1
//! DEBUG Fetch started key=["greetings","list"] generation=1 force=false
//! DEBUG HTTP GET url=http://localhost:3000/api/v2/greetings
//! ```

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// Fails if a global subscriber is already set, e.g. when several tests in
/// one binary each call this.
///
/// ```rust
/// let _ = greetings::lifecycle::setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish()
        .try_init()
}
