//! Connector Port
//!
//! Abstracts the transport used to push artifacts to remote hosts
//! (container exec, SSH/SFTP). The rebuild loop only ever talks to this trait.

use std::path::Path;

use crate::domain::value_objects::Target;
use crate::error::ConnectorResult;

/// Transport backend implementing the per-target update protocol.
///
/// Lifecycle: `initialize` exactly once after construction, any number of
/// `check_remote` / `update` calls, then `teardown` once on graceful shutdown.
/// A connector is bound to one or more remotes of a single transport type and
/// every operation applies to all of them, in configuration order.
pub trait Connector {
    /// Transport type this connector implements (e.g. "lxd", "ssh")
    fn kind(&self) -> &'static str;

    /// Remotes this connector is bound to, in configuration order
    fn remotes(&self) -> &[String];

    /// Establish persistent resources. Fails fast on the first unreachable remote.
    fn initialize(&mut self) -> ConnectorResult<()>;

    /// Verify that `dir` exists on every remote
    fn check_remote(&mut self, dir: &Path) -> ConnectorResult<()>;

    /// Push `target` to every remote and restart its service.
    ///
    /// The first failing step aborts the rest of the sequence. Steps already
    /// applied (including on earlier remotes) are not rolled back.
    fn update(&mut self, target: &Target) -> ConnectorResult<()>;

    /// Release persistent resources. Safe to call more than once.
    fn teardown(&mut self);
}

impl<C: Connector + ?Sized> Connector for Box<C> {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn remotes(&self) -> &[String] {
        (**self).remotes()
    }

    fn initialize(&mut self) -> ConnectorResult<()> {
        (**self).initialize()
    }

    fn check_remote(&mut self, dir: &Path) -> ConnectorResult<()> {
        (**self).check_remote(dir)
    }

    fn update(&mut self, target: &Target) -> ConnectorResult<()> {
        (**self).update(target)
    }

    fn teardown(&mut self) {
        (**self).teardown()
    }
}
