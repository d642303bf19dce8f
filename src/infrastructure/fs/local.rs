//! Local File System Probe
//!
//! Implements the MtimeProbe port with `stat` on the local disk.

use std::path::Path;

use crate::domain::ports::MtimeProbe;
use crate::domain::value_objects::Timestamp;

/// Reads modification times straight from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProbe;

impl LocalProbe {
    pub fn new() -> Self {
        Self
    }
}

impl MtimeProbe for LocalProbe {
    fn modified(&self, path: &Path) -> Timestamp {
        match std::fs::metadata(path).and_then(|meta| meta.modified()) {
            Ok(at) => Timestamp::Modified(at),
            Err(e) => {
                log::trace!("No timestamp for {}: {}", path.display(), e);
                Timestamp::NotFound
            }
        }
    }
}
