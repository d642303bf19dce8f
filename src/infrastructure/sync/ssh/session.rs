//! SSH session abstraction
//!
//! `SshConnector` holds one `RemoteSession` per remote for the whole run and
//! opens a short-lived `TransferSession` for every file it pushes.

use std::path::Path;

use thiserror::Error;

use crate::infrastructure::sync::command::CommandOutput;

/// Transport-level failure of an SSH session or its transfer channel
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session could not be established or was lost
    #[error("{0}")]
    Transport(String),

    /// A transfer operation was rejected by the remote side
    #[error("{operation} failed: {message}")]
    Rejected { operation: String, message: String },

    /// Local process or pipe failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where to connect: `host` or `user@host`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshAddress {
    pub user: Option<String>,
    pub host: String,
}

impl SshAddress {
    /// Parse a remote spec; without a user part the client's defaults apply
    pub fn parse(remote: &str) -> Self {
        match remote.split_once('@') {
            Some((user, host)) => Self {
                user: Some(user.to_string()),
                host: host.to_string(),
            },
            None => Self {
                user: None,
                host: remote.to_string(),
            },
        }
    }
}

/// Opens persistent sessions
pub trait SessionFactory {
    fn connect(&self, address: &SshAddress) -> Result<Box<dyn RemoteSession>, SessionError>;
}

/// Persistent session to one remote host
pub trait RemoteSession {
    /// Run `command` through the remote shell and wait for it to finish.
    ///
    /// A non-zero exit is reported in the output, not as an error.
    fn exec(&mut self, command: &str) -> Result<CommandOutput, SessionError>;

    /// Open a file-transfer sub-session.
    ///
    /// The returned handle releases its channel when dropped, on every path.
    fn open_transfer(&mut self) -> Result<Box<dyn TransferSession + '_>, SessionError>;

    /// Close the session. Safe to call more than once.
    fn close(&mut self);
}

/// Scoped file-transfer channel (SFTP)
///
/// Implementations must release the channel in `Drop` so an early return
/// through `?` never leaks it.
pub trait TransferSession {
    fn remove(&mut self, remote: &Path) -> Result<(), SessionError>;

    fn put(&mut self, local: &Path, remote: &Path) -> Result<(), SessionError>;

    fn chmod(&mut self, remote: &Path, mode: u32) -> Result<(), SessionError>;

    /// Complete every queued operation and close the channel
    fn finish(self: Box<Self>) -> Result<(), SessionError>;
}
