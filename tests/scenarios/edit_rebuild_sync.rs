//! Scenario: developer edits northd, presses Enter, the new binary lands on
//! every remote and its service restarts. A second Enter with nothing
//! rebuilt does nothing.

use std::cell::RefCell;
use std::path::Path;
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};

use ovn_rebuilder::application::{RebuildEvent, RebuildOptions, RebuildUseCase, Signal};
use ovn_rebuilder::config::parse_config;
use ovn_rebuilder::domain::ports::{BuildOutcome, Builder, SyncEvent, SyncEventSink};
use ovn_rebuilder::infrastructure::fs::LocalProbe;
use ovn_rebuilder::infrastructure::sync::LxdConnector;

use crate::common::{touch_at, RecordingRunner, Workspace};

const CONFIG: &str = "\
targets:
  - local_path: northd/ovn-northd
    remote_path: bin/ovn-northd
    service: ovn-northd
  - local_path: controller/ovn-controller
    remote_path: bin/ovn-controller
    service: ovn-controller
  - local_path: lib/libovn.so
    remote_path: lib/libovn.so
";

/// Builder that "compiles" by bumping the mtime of the given artifacts,
/// one list per build
struct TouchBuilder {
    rounds: RefCell<Vec<Vec<(String, u64)>>>,
}

impl Builder for TouchBuilder {
    fn build(&self, source_dir: &Path, _jobs: usize) -> BuildOutcome {
        let mut rounds = self.rounds.borrow_mut();
        if !rounds.is_empty() {
            for (rel, secs) in rounds.remove(0) {
                touch_at(&source_dir.join(rel), secs);
            }
        }
        BuildOutcome::succeeded()
    }
}

#[derive(Default)]
struct StepLog(Mutex<Vec<String>>);

impl SyncEventSink for StepLog {
    fn on_event(&self, event: SyncEvent) {
        self.0.lock().unwrap().push(event.to_string());
    }
}

#[test]
fn scenario_edit_rebuild_sync() {
    let ws = Workspace::new();
    ws.artifact("northd/ovn-northd", 100);
    ws.artifact("controller/ovn-controller", 100);
    // libovn.so has not been built yet
    let config = ws.write_config(CONFIG);

    let targets = parse_config(&config, &ws.src(), Path::new("/deploy")).unwrap();
    assert_eq!(targets.len(), 3);

    let runner = Arc::new(RecordingRunner::default());
    let steps = Arc::new(StepLog::default());
    let connector = LxdConnector::with_runner(
        vec!["vm1".to_string(), "vm2".to_string()],
        runner.clone(),
        steps.clone(),
    );
    let builder = TouchBuilder {
        rounds: RefCell::new(vec![vec![("northd/ovn-northd".to_string(), 200)], vec![]]),
    };
    let mut use_case = RebuildUseCase::new(
        targets,
        connector,
        builder,
        LocalProbe::new(),
        RebuildOptions::new(ws.src(), 4),
    );

    let (tx, rx) = channel();
    for signal in [Signal::Go, Signal::Go, Signal::Interrupt] {
        tx.send(signal).unwrap();
    }
    let events = RefCell::new(Vec::new());

    let summary = use_case.run(&rx, |event| events.borrow_mut().push(event));

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.updated_targets, 1);

    let local = ws.path("northd/ovn-northd");
    assert_eq!(
        runner.calls(),
        vec![
            "lxc file delete vm1/deploy/bin/ovn-northd".to_string(),
            format!("lxc file push {} vm1/deploy/bin/ovn-northd", local.display()),
            "lxc exec vm1 -- snap restart ovn-northd".to_string(),
            "lxc file delete vm2/deploy/bin/ovn-northd".to_string(),
            format!("lxc file push {} vm2/deploy/bin/ovn-northd", local.display()),
            "lxc exec vm2 -- snap restart ovn-northd".to_string(),
        ]
    );

    let steps = steps.0.lock().unwrap();
    assert_eq!(steps.len(), 6);
    assert_eq!(steps[0], "[vm1] Removing remote file /deploy/bin/ovn-northd");
    assert_eq!(steps[5], "[vm2] Restarting ovn-northd");

    let events = events.into_inner();
    assert!(events.contains(&RebuildEvent::TargetsChanged {
        targets: vec!["northd/ovn-northd (ovn-northd)".to_string()],
    }));
    assert!(events.contains(&RebuildEvent::NoChanges));
    assert_eq!(events.last(), Some(&RebuildEvent::Shutdown));
}
