//! OpenSSH-backed sessions
//!
//! A persistent session is an OpenSSH control master (`ssh -M -N`) listening
//! on a private control socket. Remote commands and `sftp` transfer channels
//! are multiplexed over it, so authentication happens once per remote and
//! follows the user's ssh configuration, agent and known_hosts.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use super::session::{RemoteSession, SessionError, SessionFactory, SshAddress, TransferSession};
use crate::infrastructure::sync::command::CommandOutput;

/// Default time allowed for the master connection to come up
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// ssh reserves this exit code for its own failures
const SSH_TRANSPORT_FAILURE: i32 = 255;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

const CONTROL_SOCKET: &str = "master.sock";

/// The master's stderr goes to a file next to the socket so it never blocks
/// on a full pipe during a long session.
const MASTER_STDERR: &str = "master.err";

/// Opens `OpenSshSession`s
#[derive(Debug, Clone)]
pub struct OpenSshFactory {
    connect_timeout: Duration,
}

impl OpenSshFactory {
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl Default for OpenSshFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactory for OpenSshFactory {
    fn connect(&self, address: &SshAddress) -> Result<Box<dyn RemoteSession>, SessionError> {
        let session = OpenSshSession::connect(address, self.connect_timeout)?;
        Ok(Box::new(session))
    }
}

/// Control-master session to one host
pub struct OpenSshSession {
    address: SshAddress,
    control_path: PathBuf,
    master: Option<Child>,
    /// Holds the control socket; removed when the session closes
    control_dir: Option<TempDir>,
}

impl OpenSshSession {
    fn connect(address: &SshAddress, timeout: Duration) -> Result<Self, SessionError> {
        let control_dir = tempfile::Builder::new()
            .prefix("ovn-rebuilder-ssh-")
            .tempdir()?;

        let mut master = Command::new("ssh");
        master
            .args(["-M", "-N", "-S"])
            .arg(control_dir.path().join(CONTROL_SOCKET))
            .args(["-o", "ControlPersist=no", "-o", "BatchMode=yes"]);
        if let Some(user) = &address.user {
            master.arg("-l").arg(user);
        }
        master.arg(&address.host);

        Self::start(address, control_dir, master, timeout)
    }

    /// Spawn the `master` command and wait until it accepts clients
    fn start(
        address: &SshAddress,
        control_dir: TempDir,
        mut master: Command,
        timeout: Duration,
    ) -> Result<Self, SessionError> {
        let control_path = control_dir.path().join(CONTROL_SOCKET);
        let stderr = File::create(control_dir.path().join(MASTER_STDERR))?;
        master
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(stderr);

        log::debug!("Opening ssh master for {}", address.host);
        let master = master
            .spawn()
            .map_err(|e| SessionError::Transport(format!("failed to start ssh: {}", e)))?;

        let mut session = Self {
            address: address.clone(),
            control_path,
            master: Some(master),
            control_dir: Some(control_dir),
        };
        session.wait_ready(timeout)?;
        Ok(session)
    }

    /// Block until the master accepts clients, it dies, or `timeout` passes
    fn wait_ready(&mut self, timeout: Duration) -> Result<(), SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(master) = self.master.as_mut() {
                if let Some(status) = master.try_wait()? {
                    self.master = None;
                    return Err(SessionError::Transport(format!(
                        "ssh exited with {}: {}",
                        status,
                        self.master_stderr().trim_end()
                    )));
                }
            }

            if self.control_check() {
                log::debug!("ssh master for {} is ready", self.address.host);
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(SessionError::Transport(format!(
                    "timed out after {}s waiting for ssh connection",
                    timeout.as_secs()
                )));
            }
            std::thread::sleep(READY_POLL_INTERVAL);
        }
    }

    /// Everything the master has written to stderr so far
    fn master_stderr(&self) -> String {
        let path = self.control_path.with_file_name(MASTER_STDERR);
        fs::read_to_string(path).unwrap_or_default()
    }

    fn control_check(&self) -> bool {
        self.control_command("check")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// `ssh -S <socket> -O <operation> host`
    fn control_command(&self, operation: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg("-S")
            .arg(&self.control_path)
            .args(["-O", operation])
            .arg(&self.address.host)
            .stdin(Stdio::null());
        cmd
    }

    fn client_args(&self) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            format!("ControlPath={}", self.control_path.display()),
            "-o".to_string(),
            "ControlMaster=no".to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
        ];
        if let Some(user) = &self.address.user {
            args.push("-o".to_string());
            args.push(format!("User={}", user));
        }
        args
    }
}

impl RemoteSession for OpenSshSession {
    fn exec(&mut self, command: &str) -> Result<CommandOutput, SessionError> {
        if self.master.is_none() {
            return Err(SessionError::Transport("session is closed".to_string()));
        }

        log::debug!("[{}] exec `{}`", self.address.host, command);
        let output: CommandOutput = Command::new("ssh")
            .args(self.client_args())
            .arg(&self.address.host)
            .arg(command)
            .stdin(Stdio::null())
            .output()?
            .into();

        if output.code == Some(SSH_TRANSPORT_FAILURE) || output.code.is_none() {
            return Err(SessionError::Transport(format!(
                "ssh connection failed: {}",
                output.stderr.trim_end()
            )));
        }
        Ok(output)
    }

    fn open_transfer(&mut self) -> Result<Box<dyn TransferSession + '_>, SessionError> {
        if self.master.is_none() {
            return Err(SessionError::Transport("session is closed".to_string()));
        }

        log::debug!("[{}] opening sftp channel", self.address.host);
        let mut sftp = Command::new("sftp");
        sftp.args(["-b", "-"])
            .args(self.client_args())
            .arg(&self.address.host);
        Ok(Box::new(SftpBatch::spawn(sftp)?))
    }

    fn close(&mut self) {
        if let Some(mut master) = self.master.take() {
            log::debug!("Closing ssh master for {}", self.address.host);
            let _ = self
                .control_command("exit")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            let _ = master.kill();
            let _ = master.wait();
        }
        self.control_dir.take();
    }
}

impl Drop for OpenSshSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// `sftp -b -` child fed one command per operation.
///
/// sftp executes the commands in order and stops at the first one that
/// fails; `finish` reports that failure. Dropping an unfinished batch kills
/// the child, so nothing queued after an error ever runs.
struct SftpBatch {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl SftpBatch {
    fn spawn(mut command: Command) -> Result<Self, SessionError> {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SessionError::Transport(format!("failed to start sftp: {}", e)))?;

        let stdin = child.stdin.take();
        Ok(Self {
            child: Some(child),
            stdin,
        })
    }

    fn send(&mut self, line: String) -> Result<(), SessionError> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| SessionError::Transport("sftp channel is closed".to_string()))?;
        log::trace!("sftp> {}", line);
        writeln!(stdin, "{}", line)
            .and_then(|_| stdin.flush())
            .map_err(|e| SessionError::Transport(format!("sftp channel closed: {}", e)))
    }
}

impl TransferSession for SftpBatch {
    fn remove(&mut self, remote: &Path) -> Result<(), SessionError> {
        self.send(format!("rm {}", sftp_quote(remote)))
    }

    fn put(&mut self, local: &Path, remote: &Path) -> Result<(), SessionError> {
        self.send(format!("put {} {}", sftp_quote(local), sftp_quote(remote)))
    }

    fn chmod(&mut self, remote: &Path, mode: u32) -> Result<(), SessionError> {
        self.send(chmod_line(remote, mode))
    }

    fn finish(mut self: Box<Self>) -> Result<(), SessionError> {
        self.stdin.take();
        let Some(child) = self.child.take() else {
            return Err(SessionError::Transport("sftp channel is closed".to_string()));
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SessionError::Rejected {
                operation: "sftp batch".to_string(),
                message: stderr.trim_end().to_string(),
            });
        }
        Ok(())
    }
}

impl Drop for SftpBatch {
    fn drop(&mut self) {
        self.stdin.take();
        if let Some(mut child) = self.child.take() {
            log::debug!("Aborting unfinished sftp channel");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Quote a path for the sftp batch parser
fn sftp_quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
}

fn chmod_line(remote: &Path, mode: u32) -> String {
    format!("chmod {:o} {}", mode & 0o7777, sftp_quote(remote))
}
