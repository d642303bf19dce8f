//! Sync Event Port
//!
//! Connectors report each remote step through this interface so the operator
//! can follow a sync as it happens (console text or NDJSON).

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One step of the per-target update sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SyncStep {
    /// Existing remote file is being removed
    Remove { path: PathBuf },
    /// Local file is being pushed to the remote path
    Upload { local: PathBuf, remote: PathBuf },
    /// Target's pre-exec command is being run
    PreExec { command: String },
    /// Owning service is being restarted
    Restart { service: String },
}

/// Step announced for a specific remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncEvent {
    pub remote: String,
    #[serde(flatten)]
    pub step: SyncStep,
}

impl SyncEvent {
    pub fn new(remote: impl Into<String>, step: SyncStep) -> Self {
        Self {
            remote: remote.into(),
            step,
        }
    }
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStep::Remove { path } => write!(f, "Removing remote file {}", path.display()),
            SyncStep::Upload { local, remote } => write!(
                f,
                "Uploading file {} to {}",
                local.display(),
                remote.display()
            ),
            SyncStep::PreExec { command } => write!(f, "Running pre-exec command `{}`", command),
            SyncStep::Restart { service } => write!(f, "Restarting {}", service),
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.remote, self.step)
    }
}

/// Trait for receiving sync events
///
/// Implementations can be:
/// - a console sink printing one line per step
/// - a JSON sink emitting NDJSON for scripts
/// - `NoopEventSink` for silent operation
pub trait SyncEventSink: Send + Sync {
    fn on_event(&self, event: SyncEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl SyncEventSink for NoopEventSink {
    fn on_event(&self, _event: SyncEvent) {}
}
