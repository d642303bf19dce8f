//! Rebuild Use Case implementation

use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;

use crate::domain::ports::{Builder, Connector, MtimeProbe};
use crate::domain::services::{changed_targets, take_snapshot};
use crate::domain::value_objects::{Snapshot, Target};

use super::event::{RebuildEvent, RebuildOptions, Signal};

/// Loop states. IDLE -> BUILDING -> COMPARING -> SYNCING -> IDLE, with
/// SHUTTING_DOWN reachable from IDLE only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Building,
    Comparing,
    Syncing,
    ShuttingDown,
}

/// How a single cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Build reported failure; nothing was compared or synced
    BuildFailed,
    /// Build succeeded but no artifact moved
    NoChanges,
    /// Every changed target was pushed
    Synced { updated: usize },
    /// A connector error stopped the sync after `updated` targets
    SyncFailed { updated: usize, message: String },
}

impl CycleOutcome {
    /// A failed build keeps the previous baseline; every other outcome
    /// starts the next wait from a fresh snapshot.
    pub fn keeps_baseline(&self) -> bool {
        matches!(self, CycleOutcome::BuildFailed)
    }
}

/// Counters for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub failed_builds: usize,
    pub failed_syncs: usize,
    pub updated_targets: usize,
}

/// Rebuild Use Case
///
/// Owns the connector for the whole run and drives the
/// build / compare / sync cycle on operator request.
pub struct RebuildUseCase<C, B, P>
where
    C: Connector,
    B: Builder,
    P: MtimeProbe,
{
    targets: BTreeSet<Target>,
    connector: C,
    builder: B,
    probe: P,
    options: RebuildOptions,
    state: LoopState,
}

impl<C, B, P> RebuildUseCase<C, B, P>
where
    C: Connector,
    B: Builder,
    P: MtimeProbe,
{
    pub fn new(
        targets: BTreeSet<Target>,
        connector: C,
        builder: B,
        probe: P,
        options: RebuildOptions,
    ) -> Self {
        Self {
            targets,
            connector,
            builder,
            probe,
            options,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Current timestamp of every target
    pub fn snapshot(&self) -> Snapshot {
        take_snapshot(&self.targets, &self.probe)
    }

    /// Run until an interrupt arrives (or every signal sender is gone).
    ///
    /// Tears the connector down exactly once before returning.
    pub fn run<F>(&mut self, signals: &Receiver<Signal>, on_event: F) -> RunSummary
    where
        F: Fn(RebuildEvent),
    {
        let mut summary = RunSummary::default();
        let mut baseline = self.snapshot();

        loop {
            self.transition(LoopState::Idle);
            on_event(RebuildEvent::Waiting);

            if wait_for_signal(signals) == Signal::Interrupt {
                break;
            }

            let outcome = self.run_cycle(&baseline, &on_event);
            summary.cycles += 1;
            match &outcome {
                CycleOutcome::BuildFailed => summary.failed_builds += 1,
                CycleOutcome::NoChanges => {}
                CycleOutcome::Synced { updated } => summary.updated_targets += updated,
                CycleOutcome::SyncFailed { updated, .. } => {
                    summary.failed_syncs += 1;
                    summary.updated_targets += updated;
                }
            }

            if !outcome.keeps_baseline() {
                baseline = self.snapshot();
            }
        }

        self.transition(LoopState::ShuttingDown);
        self.connector.teardown();
        on_event(RebuildEvent::Shutdown);
        summary
    }

    /// One BUILDING -> COMPARING -> SYNCING pass against `baseline`
    pub fn run_cycle<F>(&mut self, baseline: &Snapshot, on_event: &F) -> CycleOutcome
    where
        F: Fn(RebuildEvent),
    {
        self.transition(LoopState::Building);
        let source = &self.options.source_dir;
        let jobs = self.options.jobs;
        on_event(RebuildEvent::BuildStarted {
            source: source.display().to_string(),
            jobs,
        });
        let build = self.builder.build(source, jobs);
        if !build.success {
            on_event(RebuildEvent::BuildFailed {
                stdout: build.stdout,
                stderr: build.stderr,
            });
            return CycleOutcome::BuildFailed;
        }

        self.transition(LoopState::Comparing);
        let current = self.snapshot();
        let changed = changed_targets(baseline, &current);
        log::debug!(
            "{} changed, {} missing of {} targets",
            changed.len(),
            current.missing(),
            current.len()
        );
        if changed.is_empty() {
            on_event(RebuildEvent::NoChanges);
            return CycleOutcome::NoChanges;
        }

        self.transition(LoopState::Syncing);
        on_event(RebuildEvent::TargetsChanged {
            targets: changed.iter().map(ToString::to_string).collect(),
        });

        let mut updated = 0;
        for target in &changed {
            log::debug!("Updating {}", target);
            if let Err(e) = self.connector.update(target) {
                log::debug!(
                    "Sync aborted after {} of {} targets",
                    updated,
                    changed.len()
                );
                let message = e.to_string();
                on_event(RebuildEvent::SyncFailed {
                    message: message.clone(),
                });
                return CycleOutcome::SyncFailed { updated, message };
            }
            updated += 1;
        }

        on_event(RebuildEvent::SyncComplete { updated });
        CycleOutcome::Synced { updated }
    }

    fn transition(&mut self, next: LoopState) {
        if self.state != next {
            log::trace!("{:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

/// Block until the operator asks for something.
///
/// Signals are taken in arrival order, so an interrupt raised during a cycle
/// is honoured at the next wait. A closed channel counts as an interrupt.
fn wait_for_signal(signals: &Receiver<Signal>) -> Signal {
    signals.recv().unwrap_or(Signal::Interrupt)
}
