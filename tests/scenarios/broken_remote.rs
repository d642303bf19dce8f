//! Scenario: one remote rejects the upload. The cycle reports the error with
//! the remote's name, the loop keeps going and the next Enter retries.

use std::cell::RefCell;
use std::path::Path;
use std::sync::mpsc::channel;
use std::sync::Arc;

use ovn_rebuilder::application::{RebuildEvent, RebuildOptions, RebuildUseCase, Signal};
use ovn_rebuilder::config::parse_config;
use ovn_rebuilder::domain::ports::{BuildOutcome, Builder, NoopEventSink};
use ovn_rebuilder::infrastructure::fs::LocalProbe;
use ovn_rebuilder::infrastructure::sync::LxdConnector;

use crate::common::{touch_at, RecordingRunner, Workspace};

const CONFIG: &str = "\
targets:
  - local_path: northd/ovn-northd
    remote_path: bin/ovn-northd
    service: ovn-northd
";

/// Every build bumps northd to a later instant
struct AlwaysRelinks {
    next: RefCell<u64>,
}

impl Builder for AlwaysRelinks {
    fn build(&self, source_dir: &Path, _jobs: usize) -> BuildOutcome {
        let mut next = self.next.borrow_mut();
        *next += 100;
        touch_at(&source_dir.join("northd/ovn-northd"), *next);
        BuildOutcome::succeeded()
    }
}

#[test]
fn scenario_broken_remote_does_not_end_session() {
    let ws = Workspace::new();
    ws.artifact("northd/ovn-northd", 100);
    let config = ws.write_config(CONFIG);
    let targets = parse_config(&config, &ws.src(), Path::new("/deploy")).unwrap();

    let runner = Arc::new(RecordingRunner::failing_on("file push"));
    let connector = LxdConnector::with_runner(
        vec!["vm1".to_string(), "vm2".to_string()],
        runner.clone(),
        Arc::new(NoopEventSink),
    );
    let mut use_case = RebuildUseCase::new(
        targets,
        connector,
        AlwaysRelinks {
            next: RefCell::new(100),
        },
        LocalProbe::new(),
        RebuildOptions::new(ws.src(), 1),
    );

    let (tx, rx) = channel();
    for signal in [Signal::Go, Signal::Go, Signal::Interrupt] {
        tx.send(signal).unwrap();
    }
    let failures = RefCell::new(Vec::new());

    let summary = use_case.run(&rx, |event| {
        if let RebuildEvent::SyncFailed { message } = event {
            failures.borrow_mut().push(message);
        }
    });

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.failed_syncs, 2);

    let failures = failures.into_inner();
    assert_eq!(failures.len(), 2);
    assert!(failures[0].starts_with("[vm1] Failed to upload file"));
    assert!(failures[0].contains("Instance not found"));

    // delete went through, push failed, restart and vm2 never ran
    let calls = runner.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|c| c.contains("vm1")));
    assert!(!calls.iter().any(|c| c.contains("snap restart")));
}
