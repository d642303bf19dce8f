//! `make` based builder

use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::{BuildOutcome, Builder};

/// Runs `make -j<jobs>` in the source tree and captures its output
#[derive(Debug, Clone)]
pub struct MakeBuilder {
    program: String,
}

impl MakeBuilder {
    pub fn new() -> Self {
        Self {
            program: "make".to_string(),
        }
    }

    /// Use a different make-compatible program (e.g. `gmake`)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for MakeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder for MakeBuilder {
    fn build(&self, source_dir: &Path, jobs: usize) -> BuildOutcome {
        let jobs_arg = format!("-j{}", jobs.max(1));
        log::debug!(
            "Running `{} {}` in {}",
            self.program,
            jobs_arg,
            source_dir.display()
        );

        let output = Command::new(&self.program)
            .arg(&jobs_arg)
            .current_dir(source_dir)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                log::debug!("`{}` exited with {}", self.program, output.status);
                BuildOutcome {
                    success: output.status.success(),
                    stdout,
                    stderr,
                }
            }
            Err(e) => BuildOutcome::failed(
                String::new(),
                format!(
                    "Failed to run '{}' in {}: {}",
                    self.program,
                    source_dir.display(),
                    e
                ),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_successful_build() {
        let dir = tempdir().unwrap();
        let make = MakeBuilder::new().with_program("true");
        let outcome = make.build(dir.path(), 10);
        assert!(outcome.success);
    }

    #[test]
    fn test_failed_build() {
        let dir = tempdir().unwrap();
        let make = MakeBuilder::new().with_program("false");
        let outcome = make.build(dir.path(), 10);
        assert!(!outcome.success);
    }

    #[test]
    fn test_missing_program_is_a_failed_build() {
        let dir = tempdir().unwrap();
        let outcome = MakeBuilder::new()
            .with_program("surely-not-a-real-make")
            .build(dir.path(), 1);
        assert!(!outcome.success);
        assert!(outcome.stderr.contains("surely-not-a-real-make"));
    }

    #[test]
    fn test_missing_source_dir_is_a_failed_build() {
        let outcome = MakeBuilder::new()
            .with_program("true")
            .build(Path::new("/surely/this/path/does/not/exist"), 1);
        assert!(!outcome.success);
    }
}
