//! # Result Composition
//!
//! Every fallible operation in this crate returns a plain [`std::result::Result`].
//! Its two variants are the `Success`/`Failure` union used throughout the layers:
//!
//! - `map` transforms a success and passes a failure through unchanged.
//! - `and_then` (aliased as [`ResultExt::flat_map`]) chains a step that can itself fail.
//!
//! Once a failure enters a chain, no later closure runs.
//!
//! ```rust
//! use greetings::shared::result::{failure, success, ResultExt};
//!
//! let doubled = success::<_, String>(5).map(|x| x + 1).flat_map(|x| success(x * 2));
//! assert_eq!(doubled, Ok(12));
//!
//! let failed = failure::<i32, _>("boom").map(|x| x + 1);
//! assert_eq!(failed, Err("boom"));
//! ```

/// Wraps a value in the success variant.
pub fn success<T, E>(value: T) -> Result<T, E> {
    Ok(value)
}

/// Wraps an error in the failure variant.
pub fn failure<T, E>(error: E) -> Result<T, E> {
    Err(error)
}

/// Monadic naming for the std combinators.
pub trait ResultExt<T, E> {
    /// Chains a fallible step without double-wrapping. Skipped on failure.
    fn flat_map<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> Result<U, E>;

    /// `true` for the success variant.
    fn is_success(&self) -> bool;

    /// `true` for the failure variant.
    fn is_failure(&self) -> bool;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn flat_map<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        self.and_then(f)
    }

    fn is_success(&self) -> bool {
        self.is_ok()
    }

    fn is_failure(&self) -> bool {
        self.is_err()
    }
}
