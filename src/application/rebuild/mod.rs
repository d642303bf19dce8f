//! Rebuild Use Case
//!
//! The operator-driven development loop:
//! - Wait at IDLE for a go signal, holding a baseline snapshot
//! - Rebuild the source tree
//! - Compare artifact timestamps against the baseline
//! - Push changed targets through the connector
//!
//! ## Usage
//!
//! ```ignore
//! let mut use_case = RebuildUseCase::new(targets, connector, builder, probe, options);
//! use_case.run(&signals, |event| { ... });
//! ```

mod event;
mod use_case;


pub use event::{RebuildEvent, RebuildOptions, Signal};
pub use use_case::{CycleOutcome, LoopState, RebuildUseCase, RunSummary};
