//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod builder;
pub mod connector;
pub mod mtime_probe;
pub mod sync_events;

pub use builder::{BuildOutcome, Builder};
pub use connector::Connector;
pub use mtime_probe::MtimeProbe;
pub use sync_events::{NoopEventSink, SyncEvent, SyncEventSink, SyncStep};
