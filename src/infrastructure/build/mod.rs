//! Build Implementations
//!
//! Concrete implementations of the Builder port.

mod make;

pub use make::MakeBuilder;
