//! Builder port - the external rebuild step

use std::path::Path;

/// Result of one build invocation.
///
/// A failed build is a normal outcome, not an error: the loop skips the cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl BuildOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failed(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Synchronous build of a source tree
pub trait Builder {
    /// Build `source_dir` with `jobs` parallel jobs, blocking until done
    fn build(&self, source_dir: &Path, jobs: usize) -> BuildOutcome;
}
