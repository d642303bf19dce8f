//! Target value object - one build artifact and where it is deployed

use std::fmt;
use std::path::PathBuf;

/// Remote base directory used when none is given (unsquashed snap root)
pub const DEFAULT_REMOTE_BASE: &str = "/root/squashfs-root/";

/// One synchronizable artifact.
///
/// Equality and hashing are by value, so a set of targets never holds the
/// same artifact twice. Targets are built once from configuration and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target {
    local_rel_path: PathBuf,
    remote_rel_path: PathBuf,
    local_base_path: PathBuf,
    remote_base_path: PathBuf,
    service: Option<String>,
    pre_exec: Option<String>,
}

impl Target {
    /// Create a target from base directories and per-target relative paths
    pub fn new(
        local_base_path: impl Into<PathBuf>,
        local_rel_path: impl Into<PathBuf>,
        remote_base_path: impl Into<PathBuf>,
        remote_rel_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            local_rel_path: local_rel_path.into(),
            remote_rel_path: remote_rel_path.into(),
            local_base_path: local_base_path.into(),
            remote_base_path: remote_base_path.into(),
            service: None,
            pre_exec: None,
        }
    }

    /// Set the service restarted after this target is pushed
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Set the remote command executed after upload and before restart
    pub fn with_pre_exec(mut self, command: impl Into<String>) -> Self {
        self.pre_exec = Some(command.into());
        self
    }

    /// Full path of the artifact on the local machine
    pub fn local_path(&self) -> PathBuf {
        self.local_base_path.join(&self.local_rel_path)
    }

    /// Full path of the artifact on every remote
    pub fn remote_path(&self) -> PathBuf {
        self.remote_base_path.join(&self.remote_rel_path)
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn pre_exec(&self) -> Option<&str> {
        self.pre_exec.as_deref()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local_rel_path.display())?;
        if let Some(service) = &self.service {
            write!(f, " ({})", service)?;
        }
        Ok(())
    }
}
