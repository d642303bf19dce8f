//! Connector Implementations
//!
//! Provides concrete implementations of the Connector port:
//! - LxdConnector: LXD instances via the `lxc` CLI
//! - SshConnector: hosts reachable over SSH (persistent sessions + SFTP)
//!
//! Connectors are picked from a transport spec such as `lxd:vm1,lxd:vm2`
//! through `ConnectorRegistry`.

pub mod command;
mod lxd;
pub mod ssh;

pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use lxd::LxdConnector;
pub use ssh::SshConnector;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::ports::{Connector, SyncEventSink};
use crate::error::{ConnectorError, ConnectorResult};

const FORMAT_HINT: &str = "Expected format is '<remote_type>:<remote_address>'";

/// Parsed transport spec: one connector type and its remotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSpec {
    pub kind: String,
    pub remotes: Vec<String>,
}

impl TransportSpec {
    /// Parse `type:remote[,type:remote...]`. All pairs must share one type.
    pub fn parse(spec: &str) -> ConnectorResult<Self> {
        let mut kinds: Vec<&str> = Vec::new();
        let mut remotes = Vec::new();

        for pair in spec.split(',').map(str::trim) {
            let Some((kind, remote)) = pair.split_once(':') else {
                return Err(invalid_spec(pair, FORMAT_HINT));
            };
            if kind.is_empty() || remote.is_empty() {
                return Err(invalid_spec(pair, "Remote type and address must be set"));
            }
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
            remotes.push(remote.to_string());
        }

        match kinds.as_slice() {
            [kind] => Ok(Self {
                kind: kind.to_string(),
                remotes,
            }),
            _ => Err(invalid_spec(spec, "All remotes must be of the same type")),
        }
    }
}

fn invalid_spec(spec: &str, reason: &str) -> ConnectorError {
    ConnectorError::InvalidSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    }
}

/// Constructs a connector bound to the given remotes
pub type ConnectorBuilder = Box<dyn Fn(Vec<String>, Arc<dyn SyncEventSink>) -> Box<dyn Connector>>;

/// Connector constructors keyed by transport type
pub struct ConnectorRegistry {
    builders: BTreeMap<&'static str, ConnectorBuilder>,
}

impl ConnectorRegistry {
    /// Registry without any transport
    pub fn empty() -> Self {
        Self {
            builders: BTreeMap::new(),
        }
    }

    /// Add (or replace) the builder for `kind`
    pub fn register(
        &mut self,
        kind: &'static str,
        builder: impl Fn(Vec<String>, Arc<dyn SyncEventSink>) -> Box<dyn Connector> + 'static,
    ) {
        self.builders.insert(kind, Box::new(builder));
    }

    /// Registered transport types, sorted
    pub fn kinds(&self) -> Vec<&'static str> {
        self.builders.keys().copied().collect()
    }

    /// Parse `spec`, build the matching connector and initialize it.
    ///
    /// Nothing is connected unless the spec is valid.
    pub fn create(
        &self,
        spec: &str,
        events: Arc<dyn SyncEventSink>,
    ) -> ConnectorResult<Box<dyn Connector>> {
        let parsed = TransportSpec::parse(spec)?;
        let Some(builder) = self.builders.get(parsed.kind.as_str()) else {
            return Err(ConnectorError::UnknownType {
                kind: parsed.kind,
                available: self.kinds().join(", "),
            });
        };

        let mut connector = builder(parsed.remotes, events);
        log::debug!(
            "Initializing {} connector for {}",
            connector.kind(),
            connector.remotes().join(", ")
        );
        connector.initialize()?;
        Ok(connector)
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("lxd", lxd_connector);
        registry.register("ssh", ssh_connector);
        registry
    }
}

fn lxd_connector(remotes: Vec<String>, events: Arc<dyn SyncEventSink>) -> Box<dyn Connector> {
    Box::new(LxdConnector::new(remotes, events))
}

fn ssh_connector(remotes: Vec<String>, events: Arc<dyn SyncEventSink>) -> Box<dyn Connector> {
    Box::new(SshConnector::new(remotes, events))
}

/// Create and initialize a connector from a transport spec using the
/// built-in transports.
pub fn create_connector(
    spec: &str,
    events: Arc<dyn SyncEventSink>,
) -> ConnectorResult<Box<dyn Connector>> {
    ConnectorRegistry::default().create(spec, events)
}
