//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod target;
mod timestamp;

pub use target::{Target, DEFAULT_REMOTE_BASE};
pub use timestamp::{Snapshot, Timestamp};
