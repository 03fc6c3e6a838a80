//! Types shared by every layer.

pub mod result;

pub use result::{failure, success, ResultExt};
