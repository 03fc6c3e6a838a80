//! The Greeting domain: value objects, entities and their invariants.
//!
//! Nothing in here performs I/O or logs. Construction is the only place
//! invariants are checked, so any value of these types is valid.

pub mod error;
pub mod greeting;
pub mod message;

pub use error::*;
pub use greeting::*;
pub use message::*;
