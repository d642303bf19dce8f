//! MtimeProbe port - reads artifact modification times

use std::path::Path;

use crate::domain::value_objects::Timestamp;

/// Source of last-modified timestamps.
///
/// Any failure to read the file (missing, permission denied, dangling link)
/// is reported as `Timestamp::NotFound`; probing never errors.
pub trait MtimeProbe {
    fn modified(&self, path: &Path) -> Timestamp;
}
