//! ovn-rebuilder - developer loop for OVN on MicroOVN hosts
//!
//! Rebuilds a local OVN source tree on request, detects which configured
//! artifacts changed by comparing modification times around the build, and
//! pushes only those to a set of remote hosts (LXD instances or SSH hosts),
//! restarting the services that own them.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{RebuildEvent, RebuildOptions, RebuildUseCase, Signal};
pub use config::parse_config;
pub use domain::ports::{Connector, SyncEvent, SyncEventSink};
pub use domain::value_objects::{Target, Timestamp};
pub use error::{ConfigError, ConfigResult, ConnectorError, ConnectorResult};
pub use infrastructure::sync::{create_connector, ConnectorRegistry};
