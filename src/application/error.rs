//! Error types surfaced by greeting queries and mutations.

use super::validation::ValidationErrors;
use crate::domain::InvalidGreeting;
use crate::query::{QueryError, QueryKey};
use crate::repository::RepositoryError;
use thiserror::Error;

/// Errors returned by [`GreetingQueries`](super::GreetingQueries) and
/// [`CreateGreetingMutation`](super::CreateGreetingMutation).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GreetingError {
    /// The input was rejected before any network access.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The service answered with data that breaks a domain rule.
    #[error("Invalid greeting: {0}")]
    Domain(#[from] InvalidGreeting),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The query cache task is gone.
    #[error("Query cache unavailable: {0}")]
    CacheUnavailable(String),

    /// A cache entry held a different kind of value than its key implies.
    #[error("Unexpected cached payload for {0}")]
    UnexpectedPayload(QueryKey),
}

impl From<QueryError<GreetingError>> for GreetingError {
    fn from(err: QueryError<GreetingError>) -> Self {
        match err {
            QueryError::Fetch(inner) => inner,
            other => GreetingError::CacheUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_is_unwrapped() {
        let inner = GreetingError::Repository(RepositoryError::NotFound("7".into()));
        assert_eq!(GreetingError::from(QueryError::Fetch(inner.clone())), inner);
    }

    #[test]
    fn test_plumbing_errors_become_cache_unavailable() {
        let err = GreetingError::from(QueryError::<GreetingError>::CacheClosed);
        assert_eq!(
            err,
            GreetingError::CacheUnavailable("Query cache closed".into())
        );
    }
}
