//! SSH Connector
//!
//! Keeps one persistent session per remote. Files are pushed over a scoped
//! SFTP channel; service restarts and directory checks run as remote commands.

mod openssh;
mod session;

pub use openssh::{OpenSshFactory, OpenSshSession, DEFAULT_CONNECT_TIMEOUT};
pub use session::{RemoteSession, SessionError, SessionFactory, SshAddress, TransferSession};

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;

use super::command::shell_quote;
use crate::domain::ports::{Connector, SyncEvent, SyncEventSink, SyncStep};
use crate::domain::value_objects::Target;
use crate::error::{ConnectorError, ConnectorResult};

/// Connector for hosts reachable over SSH
pub struct SshConnector<F: SessionFactory = OpenSshFactory> {
    remotes: Vec<String>,
    factory: F,
    /// Open sessions keyed by remote, in configuration order
    sessions: Vec<(String, Box<dyn RemoteSession>)>,
    events: Arc<dyn SyncEventSink>,
}

impl SshConnector<OpenSshFactory> {
    pub fn new(remotes: Vec<String>, events: Arc<dyn SyncEventSink>) -> Self {
        Self::with_factory(remotes, OpenSshFactory::new(), events)
    }
}

impl<F: SessionFactory> SshConnector<F> {
    pub fn with_factory(remotes: Vec<String>, factory: F, events: Arc<dyn SyncEventSink>) -> Self {
        Self {
            remotes,
            factory,
            sessions: Vec::new(),
            events,
        }
    }

    /// Remotes that currently hold an open session
    pub fn connected(&self) -> Vec<&str> {
        self.sessions
            .iter()
            .map(|(remote, _)| remote.as_str())
            .collect()
    }

    fn ensure_connected(&self) -> ConnectorResult<()> {
        if self.sessions.len() == self.remotes.len() {
            return Ok(());
        }
        let missing = self
            .remotes
            .iter()
            .find(|r| !self.sessions.iter().any(|(s, _)| s == *r))
            .cloned()
            .unwrap_or_default();
        Err(ConnectorError::Connect {
            remote: missing,
            message: "no open session (connector not initialized)".to_string(),
        })
    }

    /// Queue rm, put and chmod on one batch and wait for it to complete.
    ///
    /// The batch only runs at `finish`, so nothing is reported as done before
    /// the remote side has accepted every operation.
    fn push_file(
        session: &mut dyn RemoteSession,
        target: &Target,
        mode: u32,
    ) -> Result<(), SessionError> {
        let remote_path = target.remote_path();

        let mut transfer = session.open_transfer()?;
        transfer.remove(&remote_path)?;
        transfer.put(&target.local_path(), &remote_path)?;
        transfer.chmod(&remote_path, mode)?;
        transfer.finish()
    }
}

/// Run `command` on `remote`, turning non-zero exits and transport failures
/// into connector errors.
fn run_command(
    session: &mut dyn RemoteSession,
    remote: &str,
    command: &str,
    action: &str,
) -> ConnectorResult<()> {
    let failed = |stderr: String| ConnectorError::Command {
        remote: remote.to_string(),
        action: action.to_string(),
        command: command.to_string(),
        stderr,
    };

    let output = session.exec(command).map_err(|e| failed(e.to_string()))?;
    if !output.is_success() {
        return Err(failed(output.stderr));
    }
    Ok(())
}

impl<F: SessionFactory> Connector for SshConnector<F> {
    fn kind(&self) -> &'static str {
        "ssh"
    }

    fn remotes(&self) -> &[String] {
        &self.remotes
    }

    fn initialize(&mut self) -> ConnectorResult<()> {
        for remote in &self.remotes {
            let address = SshAddress::parse(remote);
            match self.factory.connect(&address) {
                Ok(session) => {
                    log::debug!("Connected to {}", remote);
                    self.sessions.push((remote.clone(), session));
                }
                Err(e) => {
                    // fail fast: release whatever was opened before this remote
                    for (_, mut session) in self.sessions.drain(..) {
                        session.close();
                    }
                    return Err(ConnectorError::Connect {
                        remote: remote.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_remote(&mut self, dir: &Path) -> ConnectorResult<()> {
        self.ensure_connected()?;
        let dir = dir.to_string_lossy();
        let command = format!("test -d {}", shell_quote(&dir));
        let action = format!("Remote directory '{}' does not exist", dir);

        for (remote, session) in &mut self.sessions {
            run_command(session.as_mut(), remote, &command, &action)?;
        }
        Ok(())
    }

    fn update(&mut self, target: &Target) -> ConnectorResult<()> {
        self.ensure_connected()?;
        let events = self.events.as_ref();

        for (remote, session) in &mut self.sessions {
            let local = target.local_path();
            let mode = std::fs::metadata(&local)
                .map(|meta| meta.permissions().mode())
                .map_err(|source| ConnectorError::Io {
                    remote: remote.clone(),
                    action: format!("Failed to read local file {}", local.display()),
                    source,
                })?;

            if let Err(e) = Self::push_file(session.as_mut(), target, mode) {
                return Err(ConnectorError::Transfer {
                    remote: remote.clone(),
                    action: "Failed to transfer file".to_string(),
                    message: e.to_string(),
                });
            }

            let remote_path = target.remote_path();
            events.on_event(SyncEvent::new(
                remote.as_str(),
                SyncStep::Remove {
                    path: remote_path.clone(),
                },
            ));
            events.on_event(SyncEvent::new(
                remote.as_str(),
                SyncStep::Upload {
                    local,
                    remote: remote_path,
                },
            ));

            if let Some(command) = target.pre_exec() {
                events.on_event(SyncEvent::new(
                    remote.as_str(),
                    SyncStep::PreExec {
                        command: command.to_string(),
                    },
                ));
                run_command(
                    session.as_mut(),
                    remote,
                    command,
                    "Failed to run pre-exec command",
                )?;
            }

            if let Some(service) = target.service() {
                events.on_event(SyncEvent::new(
                    remote.as_str(),
                    SyncStep::Restart {
                        service: service.to_string(),
                    },
                ));
                run_command(
                    session.as_mut(),
                    remote,
                    &format!("snap restart {}", shell_quote(service)),
                    "Failed to restart service",
                )?;
            }
        }
        Ok(())
    }

    fn teardown(&mut self) {
        for (remote, mut session) in self.sessions.drain(..) {
            log::debug!("Closing session to {}", remote);
            session.close();
        }
    }
}
