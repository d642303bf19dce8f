//! Common test utilities for ovn-rebuilder integration tests.
//!
//! This module provides:
//! - `Workspace`: temp source tree + config file
//! - `RecordingRunner`: `CommandRunner` that records `lxc` invocations
//! - `touch_at`: set an artifact's mtime to a fixed instant

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

use ovn_rebuilder::infrastructure::sync::{CommandOutput, CommandRunner};

/// Temporary OVN source tree with a target config next to it
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn src(&self) -> PathBuf {
        self.dir.path().join("ovn")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.src().join(rel)
    }

    /// Create an artifact under the source tree
    pub fn artifact(&self, rel: &str, secs: u64) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, rel.as_bytes()).unwrap();
        touch_at(&path, secs);
        path
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("targets.yaml");
        fs::write(&path, content).unwrap();
        path
    }
}

pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

pub fn touch_at(path: &Path, secs: u64) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(at(secs))
        .unwrap();
}

/// Records every program invocation and answers with success, unless the
/// command line contains `fail_on`
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<String>>,
    pub fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: Some(pattern.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let line = format!("{} {}", program, args.join(" "));
        self.calls.lock().unwrap().push(line.clone());
        match &self.fail_on {
            Some(pattern) if line.contains(pattern.as_str()) => {
                Ok(CommandOutput::failure(1, "Error: Instance not found"))
            }
            _ => Ok(CommandOutput::success()),
        }
    }
}

/// Run the binary with stdin closed
pub fn run_bin(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ovn-rebuilder"))
        .args(args)
        .stdin(std::process::Stdio::null())
        .output()
        .unwrap()
}
