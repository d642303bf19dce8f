//! Domain Layer
//!
//! Pure logic of the rebuild loop, free of process and network I/O.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (Target, Timestamp, Snapshot)
//! - `services/` - Domain services (change detection)
//! - `ports/` - Interface definitions for infrastructure (Connector, Builder, MtimeProbe)

pub mod ports;
pub mod services;
pub mod value_objects;
