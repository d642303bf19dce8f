//! Modification timestamps and snapshots of them

use std::collections::BTreeMap;
use std::time::SystemTime;

use super::Target;

/// Last-modified reading of one target's local artifact.
///
/// `NotFound` is distinct from every valid instant, so a vanished file never
/// compares equal to a previous reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timestamp {
    /// The artifact could not be stat'ed
    NotFound,
    /// The artifact exists and was last modified at this instant
    Modified(SystemTime),
}

impl Timestamp {
    pub fn is_found(&self) -> bool {
        matches!(self, Timestamp::Modified(_))
    }
}

impl From<Option<SystemTime>> for Timestamp {
    fn from(value: Option<SystemTime>) -> Self {
        value.map_or(Timestamp::NotFound, Timestamp::Modified)
    }
}

/// Timestamps of every known target, taken at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    readings: BTreeMap<Target, Timestamp>,
}

impl Snapshot {
    /// Reading for `target`; targets never recorded read as `NotFound`
    pub fn get(&self, target: &Target) -> Timestamp {
        self.readings
            .get(target)
            .copied()
            .unwrap_or(Timestamp::NotFound)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Target, &Timestamp)> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Number of targets whose artifact is currently missing
    pub fn missing(&self) -> usize {
        self.readings.values().filter(|ts| !ts.is_found()).count()
    }
}

impl FromIterator<(Target, Timestamp)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (Target, Timestamp)>>(iter: I) -> Self {
        Self {
            readings: iter.into_iter().collect(),
        }
    }
}
