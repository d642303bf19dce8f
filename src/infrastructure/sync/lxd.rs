//! LXD Connector
//!
//! Pushes artifacts into LXD instances with the `lxc` CLI. Stateless: every
//! operation is a fresh `lxc` invocation.

use std::path::Path;
use std::sync::Arc;

use super::command::{render_command, CommandRunner, SystemRunner};
use crate::domain::ports::{Connector, SyncEvent, SyncEventSink, SyncStep};
use crate::domain::value_objects::Target;
use crate::error::{ConnectorError, ConnectorResult};

const LXC: &str = "lxc";

/// Connector for LXD containers and VMs
pub struct LxdConnector<R: CommandRunner = SystemRunner> {
    remotes: Vec<String>,
    runner: R,
    events: Arc<dyn SyncEventSink>,
}

impl LxdConnector<SystemRunner> {
    pub fn new(remotes: Vec<String>, events: Arc<dyn SyncEventSink>) -> Self {
        Self::with_runner(remotes, SystemRunner, events)
    }
}

impl<R: CommandRunner> LxdConnector<R> {
    pub fn with_runner(remotes: Vec<String>, runner: R, events: Arc<dyn SyncEventSink>) -> Self {
        Self {
            remotes,
            runner,
            events,
        }
    }

    /// `lxc file` path syntax: `<instance>/<absolute path>`
    fn instance_path(remote: &str, path: &Path) -> String {
        let path = path.to_string_lossy();
        format!("{}/{}", remote, path.trim_start_matches('/'))
    }

    fn run(&self, remote: &str, action: &str, args: Vec<String>) -> ConnectorResult<()> {
        let output = self
            .runner
            .run(LXC, &args)
            .map_err(|source| ConnectorError::Io {
                remote: remote.to_string(),
                action: action.to_string(),
                source,
            })?;

        if !output.is_success() {
            return Err(ConnectorError::Command {
                remote: remote.to_string(),
                action: action.to_string(),
                command: render_command(LXC, &args),
                stderr: output.stderr,
            });
        }

        Ok(())
    }

    fn exec_args(remote: &str, command: &[&str]) -> Vec<String> {
        ["exec", remote, "--"]
            .iter()
            .chain(command)
            .map(|s| s.to_string())
            .collect()
    }

    fn update_remote(&self, remote: &str, target: &Target) -> ConnectorResult<()> {
        let local = target.local_path();
        let remote_path = target.remote_path();
        let instance_path = Self::instance_path(remote, &remote_path);

        self.events.on_event(SyncEvent::new(
            remote,
            SyncStep::Remove {
                path: remote_path.clone(),
            },
        ));
        self.run(
            remote,
            "Failed to remove remote file",
            vec!["file".into(), "delete".into(), instance_path.clone()],
        )?;

        self.events.on_event(SyncEvent::new(
            remote,
            SyncStep::Upload {
                local: local.clone(),
                remote: remote_path,
            },
        ));
        self.run(
            remote,
            "Failed to upload file",
            vec![
                "file".into(),
                "push".into(),
                local.to_string_lossy().into_owned(),
                instance_path,
            ],
        )?;

        if let Some(command) = target.pre_exec() {
            self.events.on_event(SyncEvent::new(
                remote,
                SyncStep::PreExec {
                    command: command.to_string(),
                },
            ));
            self.run(
                remote,
                "Failed to run pre-exec command",
                Self::exec_args(remote, &["sh", "-c", command]),
            )?;
        }

        if let Some(service) = target.service() {
            self.events.on_event(SyncEvent::new(
                remote,
                SyncStep::Restart {
                    service: service.to_string(),
                },
            ));
            self.run(
                remote,
                "Failed to restart service",
                Self::exec_args(remote, &["snap", "restart", service]),
            )?;
        }

        Ok(())
    }
}

impl<R: CommandRunner> Connector for LxdConnector<R> {
    fn kind(&self) -> &'static str {
        "lxd"
    }

    fn remotes(&self) -> &[String] {
        &self.remotes
    }

    fn initialize(&mut self) -> ConnectorResult<()> {
        log::debug!("lxd connector bound to {}", self.remotes.join(", "));
        Ok(())
    }

    fn check_remote(&mut self, dir: &Path) -> ConnectorResult<()> {
        let dir = dir.to_string_lossy().into_owned();
        for remote in &self.remotes {
            self.run(
                remote,
                &format!(
                    "Remote directory '{}' does not exist on LXC instance {}",
                    dir, remote
                ),
                Self::exec_args(remote, &["test", "-d", dir.as_str()]),
            )?;
        }
        Ok(())
    }

    fn update(&mut self, target: &Target) -> ConnectorResult<()> {
        for remote in &self.remotes {
            self.update_remote(remote, target)?;
        }
        Ok(())
    }

    fn teardown(&mut self) {}
}
