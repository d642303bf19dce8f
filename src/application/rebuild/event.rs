//! Rebuild loop events, options and operator signals

use std::path::PathBuf;

use crate::domain::ports::SyncEvent;

/// Rebuild loop options
#[derive(Debug, Clone)]
pub struct RebuildOptions {
    /// Directory `make` runs in (the local base of every target)
    pub source_dir: PathBuf,
    /// Parallel build jobs
    pub jobs: usize,
}

impl RebuildOptions {
    pub fn new(source_dir: impl Into<PathBuf>, jobs: usize) -> Self {
        Self {
            source_dir: source_dir.into(),
            jobs: jobs.max(1),
        }
    }
}

/// Operator input delivered to the IDLE wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Rebuild and sync now
    Go,
    /// Stop the loop
    Interrupt,
}

/// Rebuild event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RebuildEvent {
    Waiting,
    BuildStarted { source: String, jobs: usize },
    BuildFailed { stdout: String, stderr: String },
    NoChanges,
    TargetsChanged { targets: Vec<String> },
    RemoteStep { remote: String, message: String },
    SyncComplete { updated: usize },
    SyncFailed { message: String },
    Shutdown,
}

impl RebuildEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<SyncEvent> for RebuildEvent {
    fn from(event: SyncEvent) -> Self {
        RebuildEvent::RemoteStep {
            message: event.step.to_string(),
            remote: event.remote,
        }
    }
}
