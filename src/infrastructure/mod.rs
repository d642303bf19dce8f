//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `build/` - Builder implementation (`make`)
//! - `fs/` - Modification-time probe for local artifacts
//! - `sync/` - Connectors (LXD, SSH) and the transport registry

pub mod build;
pub mod fs;
pub mod sync;

// Re-export for convenience
pub use build::MakeBuilder;
pub use fs::LocalProbe;
pub use sync::{create_connector, ConnectorRegistry, LxdConnector, SshConnector};
