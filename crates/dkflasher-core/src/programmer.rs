//! Programmer trait definitions
//!
//! A [`Programmer`] is the boundary to the external tool that actually
//! talks to the debug probes. Every method is one blocking invocation that
//! either succeeds (exit status zero) or returns an error describing the
//! failed invocation.
//!
//! Implementations are shared by reference across the worker threads of a
//! fleet round, hence the `Sync` bound used by the orchestrator. The tool is
//! assumed safe to invoke concurrently for *different* probe serials; the
//! orchestrator never issues two concurrent invocations for the same serial.

use core::fmt;
use std::path::Path;

use crate::error::Result;

/// Core of the nRF5340 to program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreTarget {
    /// Application core
    Application,
    /// Network core
    Network,
}

impl fmt::Display for CoreTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application => f.pad("app"),
            Self::Network => f.pad("net"),
        }
    }
}

/// How flash is erased before programming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EraseStrategy {
    /// Erase only the sectors covered by the image
    SectorErase,
    /// Erase the whole chip (including UICR)
    ChipErase,
}

/// External programmer tool contract
pub trait Programmer {
    /// Program `image` into `core` of the device behind `probe_serial`
    fn program(
        &self,
        core: CoreTarget,
        image: &Path,
        probe_serial: u32,
        erase: EraseStrategy,
    ) -> Result<()>;

    /// Write a single 32-bit word at `address`
    fn write_register(&self, address: u32, value: u32, probe_serial: u32) -> Result<()>;

    /// Reset the device so it starts running
    fn reset(&self, probe_serial: u32) -> Result<()>;
}

impl<P: Programmer + ?Sized> Programmer for &P {
    fn program(
        &self,
        core: CoreTarget,
        image: &Path,
        probe_serial: u32,
        erase: EraseStrategy,
    ) -> Result<()> {
        (**self).program(core, image, probe_serial, erase)
    }

    fn write_register(&self, address: u32, value: u32, probe_serial: u32) -> Result<()> {
        (**self).write_register(address, value, probe_serial)
    }

    fn reset(&self, probe_serial: u32) -> Result<()> {
        (**self).reset(probe_serial)
    }
}

impl<P: Programmer + ?Sized> Programmer for Box<P> {
    fn program(
        &self,
        core: CoreTarget,
        image: &Path,
        probe_serial: u32,
        erase: EraseStrategy,
    ) -> Result<()> {
        (**self).program(core, image, probe_serial, erase)
    }

    fn write_register(&self, address: u32, value: u32, probe_serial: u32) -> Result<()> {
        (**self).write_register(address, value, probe_serial)
    }

    fn reset(&self, probe_serial: u32) -> Result<()> {
        (**self).reset(probe_serial)
    }
}
