//! Change detection between two timestamp snapshots

use std::collections::BTreeSet;

use crate::domain::ports::MtimeProbe;
use crate::domain::value_objects::{Snapshot, Target};

/// Read the current timestamp of every target
pub fn take_snapshot<'a, I>(targets: I, probe: &dyn MtimeProbe) -> Snapshot
where
    I: IntoIterator<Item = &'a Target>,
{
    targets
        .into_iter()
        .map(|target| (target.clone(), probe.modified(&target.local_path())))
        .collect()
}

/// Targets whose artifact moved between `baseline` and `current`.
///
/// A target is changed iff its current reading is a valid instant that differs
/// from its baseline. Targets that vanished (`NotFound` now) are never
/// changed, whatever their baseline was.
pub fn changed_targets(baseline: &Snapshot, current: &Snapshot) -> BTreeSet<Target> {
    current
        .iter()
        .filter(|(_, ts)| ts.is_found())
        .filter(|(target, ts)| baseline.get(target) != **ts)
        .map(|(target, _)| target.clone())
        .collect()
}
