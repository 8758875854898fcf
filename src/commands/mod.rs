//! CLI command implementations
//!
//! ## Fleet commands
//!
//! `program` and `reboot` load the device file, apply the command-line
//! selection, and hand the descriptors to the fleet orchestrator. Both print
//! a per-device summary afterwards and fail if any device failed.
//!
//! ## List commands
//!
//! `list-devices` and `list-programmers` only print information.

mod list;
pub mod program;
mod progress;

pub use list::{list_devices, list_programmers};
