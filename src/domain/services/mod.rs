//! Domain Services
//!
//! Stateless logic operating on domain value objects.

mod change_detector;

pub use change_detector::{changed_targets, take_snapshot};
