//! Application Layer
//!
//! Use cases that wire domain services to the ports.

pub mod rebuild;

pub use rebuild::{
    CycleOutcome, LoopState, RebuildEvent, RebuildOptions, RebuildUseCase, RunSummary, Signal,
};
