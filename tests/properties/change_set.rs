//! Property tests for change detection between two snapshots.

use std::time::{Duration, UNIX_EPOCH};

use proptest::prelude::*;

use ovn_rebuilder::domain::services::changed_targets;
use ovn_rebuilder::domain::value_objects::{Snapshot, Target, Timestamp};

fn timestamp() -> impl Strategy<Value = Timestamp> {
    prop_oneof![
        1 => Just(Timestamp::NotFound),
        3 => (0u64..8).prop_map(|s| Timestamp::Modified(UNIX_EPOCH + Duration::from_secs(s))),
    ]
}

fn target(i: usize) -> Target {
    Target::new("/src", format!("bin/t{}", i), "/r", format!("bin/t{}", i))
}

/// Pairs of (baseline, current) readings, one per target
fn readings() -> impl Strategy<Value = Vec<(Timestamp, Timestamp)>> {
    proptest::collection::vec((timestamp(), timestamp()), 0..24)
}

fn snapshots(readings: &[(Timestamp, Timestamp)]) -> (Snapshot, Snapshot) {
    let baseline = readings
        .iter()
        .enumerate()
        .map(|(i, (b, _))| (target(i), *b))
        .collect();
    let current = readings
        .iter()
        .enumerate()
        .map(|(i, (_, c))| (target(i), *c))
        .collect();
    (baseline, current)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: t is changed iff current(t) is found and differs from baseline(t).
    #[test]
    fn property_changed_iff_found_and_different(pairs in readings()) {
        let (baseline, current) = snapshots(&pairs);
        let changed = changed_targets(&baseline, &current);

        for (i, (b, c)) in pairs.iter().enumerate() {
            let expected = c.is_found() && c != b;
            prop_assert_eq!(
                changed.contains(&target(i)),
                expected,
                "target {}: {:?} -> {:?}",
                i,
                b,
                c
            );
        }
    }

    /// PROPERTY: deleted artifacts never count as changed.
    #[test]
    fn property_all_missing_means_nothing_changed(pairs in readings()) {
        let missing: Vec<_> = pairs.iter().map(|(b, _)| (*b, Timestamp::NotFound)).collect();
        let (baseline, current) = snapshots(&missing);

        prop_assert!(changed_targets(&baseline, &current).is_empty());
    }

    /// PROPERTY: comparing a snapshot with itself yields no changes.
    #[test]
    fn property_identical_snapshots_are_unchanged(pairs in readings()) {
        let (baseline, _) = snapshots(&pairs);

        prop_assert!(changed_targets(&baseline, &baseline.clone()).is_empty());
    }
}
