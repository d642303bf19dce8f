//! Configuration type definitions

use std::path::PathBuf;

use serde::Deserialize;

/// Keys every target entry must carry
pub(crate) const REQUIRED_KEYS: [&str; 2] = ["local_path", "remote_path"];

/// One entry of the `targets` list, as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetEntry {
    pub local_path: PathBuf,
    pub remote_path: PathBuf,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub pre_exec: Option<String>,
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    /// Zero-based position of the entry in `targets`
    pub entry: usize,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown key '{}' in target entry #{} of {} (ignored)",
            self.key,
            self.entry,
            self.file.display()
        )
    }
}
