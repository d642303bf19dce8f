//! Target configuration
//!
//! Reads the YAML document listing the artifacts to watch:
//!
//! ```yaml
//! targets:
//!   - local_path: northd/ovn-northd
//!     remote_path: bin/ovn-northd
//!     service: ovn-northd
//! ```
//!
//! Local paths are relative to the source tree, remote paths to the remote
//! base directory.

mod loader;
mod types;

pub use loader::{load_with_warnings, parse_config, parse_str};
pub use types::{ConfigWarning, TargetEntry};
