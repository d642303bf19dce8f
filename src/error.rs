//! Error types for the rebuilder
//!
//! Uses `thiserror` for library errors. The binary wraps them with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for connector operations
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Bad or missing target configuration. Always fatal, raised before the loop starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be opened or read
    #[error("Cannot open config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML
    #[error("Cannot parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Document has no `targets` key
    #[error("No targets found in config file: {path}")]
    MissingTargets { path: PathBuf },

    /// `targets` is present but is not a list
    #[error("'targets' must be non-empty list (config file: {path})")]
    NotAList { path: PathBuf },

    /// `targets` is an empty list
    #[error("No targets found in config file: {path}")]
    EmptyTargets { path: PathBuf },

    /// A target entry lacks a required key
    #[error("One of the 'targets' in config file '{path}' is missing key: {key} (entry #{index})")]
    MissingKey {
        path: PathBuf,
        index: usize,
        key: String,
    },

    /// A target entry has a key of the wrong type
    #[error("Invalid target entry #{index} in config file '{path}': {message}")]
    InvalidEntry {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

/// Transport-level failure reported by a connector.
///
/// Every remote-facing variant carries the remote identity, the operation that
/// failed and the captured error text.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Malformed transport spec string
    #[error("'{spec}' is not valid remote specification. {reason}")]
    InvalidSpec { spec: String, reason: String },

    /// Transport type not present in the connector registry
    #[error("{kind} is not a valid connector type. Available types: {available}")]
    UnknownType { kind: String, available: String },

    /// Persistent session could not be established
    #[error("Failed to connect to {remote}: {message}")]
    Connect { remote: String, message: String },

    /// Remote command exited non-zero
    #[error("[{remote}] {action}: `{command}`{}", format_stderr(.stderr))]
    Command {
        remote: String,
        action: String,
        command: String,
        stderr: String,
    },

    /// File transfer sub-session failed
    #[error("[{remote}] {action}: {message}")]
    Transfer {
        remote: String,
        action: String,
        message: String,
    },

    /// Local process or file operation failed while talking to a remote
    #[error("[{remote}] {action}: {source}")]
    Io {
        remote: String,
        action: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConnectorError {
    /// Remote the error belongs to, if it is remote-specific
    pub fn remote(&self) -> Option<&str> {
        match self {
            Self::Connect { remote, .. }
            | Self::Command { remote, .. }
            | Self::Transfer { remote, .. }
            | Self::Io { remote, .. } => Some(remote),
            Self::InvalidSpec { .. } | Self::UnknownType { .. } => None,
        }
    }
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_key() {
        let err = ConfigError::MissingKey {
            path: PathBuf::from("targets.yaml"),
            index: 2,
            key: "remote_path".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "One of the 'targets' in config file 'targets.yaml' is missing key: remote_path (entry #2)"
        );
    }

    #[test]
    fn test_command_error_includes_stderr() {
        let err = ConnectorError::Command {
            remote: "vm1".to_string(),
            action: "Failed to remove remote file".to_string(),
            command: "lxc file delete vm1/root/a".to_string(),
            stderr: "Error: not found\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "[vm1] Failed to remove remote file: `lxc file delete vm1/root/a`: Error: not found"
        );
        assert_eq!(err.remote(), Some("vm1"));
    }

    #[test]
    fn test_command_error_without_stderr() {
        let err = ConnectorError::Command {
            remote: "vm2".to_string(),
            action: "Failed to restart service".to_string(),
            command: "snap restart ovn-northd".to_string(),
            stderr: "  \n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "[vm2] Failed to restart service: `snap restart ovn-northd`"
        );
    }

    #[test]
    fn test_spec_errors_have_no_remote() {
        let err = ConnectorError::UnknownType {
            kind: "foo".to_string(),
            available: "lxd, ssh".to_string(),
        };
        assert!(err.remote().is_none());
        assert_eq!(
            err.to_string(),
            "foo is not a valid connector type. Available types: lxd, ssh"
        );
    }
}
