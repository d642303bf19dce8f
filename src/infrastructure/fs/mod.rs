//! File System Implementations
//!
//! Concrete implementations of the MtimeProbe port.

mod local;

pub use local::LocalProbe;
