//! dkflasher-core - Core library for programming fleets of nRF5340 Audio DKs
//!
//! Each development kit has two cores (application and network) that are
//! flashed by separate invocations of an external programmer tool, followed
//! by a few UICR register writes and a reset. This crate sequences those
//! steps per device and runs independent devices in parallel.
//!
//! # Overview
//!
//! - [`device`] - Device descriptors and per-phase status flags
//! - [`programmer`] - The [`Programmer`] trait backends implement
//! - [`uicr`] - Channel and identity writes into the UICR region
//! - [`phase`] - Runs a single phase for a single device
//! - [`fleet`] - Two-round orchestration across all devices
//! - [`config`] - Loading device descriptors from a TOML file
//!
//! # Example
//!
//! ```ignore
//! use dkflasher_core::{fleet, DeviceDescriptor, Programmer};
//!
//! fn flash_all<P: Programmer + Sync>(programmer: &P, devices: &mut [DeviceDescriptor]) {
//!     fleet::program_fleet(programmer, devices, false);
//!     for dev in devices.iter() {
//!         println!("{}: app={} net={}", dev.probe_serial, dev.app_programmed, dev.net_programmed);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod device;
pub mod error;
pub mod fleet;
pub mod phase;
pub mod programmer;
pub mod progress;
pub mod uicr;

#[cfg(test)]
pub(crate) mod testing;

pub use device::{fleet_failed, Channel, DeviceDescriptor, DeviceKind, StatusFlag};
pub use error::{Error, Result};
pub use phase::Phase;
pub use programmer::{CoreTarget, EraseStrategy, Programmer};
pub use progress::{FleetProgress, NoProgress};
