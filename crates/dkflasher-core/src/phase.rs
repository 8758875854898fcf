//! Single-device, single-phase execution
//!
//! [`run_phase`] is the unit of work the fleet orchestrator dispatches to a
//! worker thread. It blocks for the duration of the programmer invocations,
//! records the outcome in the descriptor's status flag for that phase, and
//! finally resets the device so it is left running whatever the outcome.

use core::fmt;

use crate::device::{DeviceDescriptor, StatusFlag};
use crate::programmer::{CoreTarget, EraseStrategy, Programmer};
use crate::progress::{FleetProgress, NoProgress};
use crate::uicr;

/// A phase of work on one device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Reset only, no programming
    Reboot,
    /// Program the network core
    Net,
    /// Program the application core, then write UICR
    App,
}

impl Phase {
    /// Status flag this phase writes
    fn status_mut(self, dev: &mut DeviceDescriptor) -> &mut StatusFlag {
        match self {
            Self::Reboot => &mut dev.reboot_only,
            Self::Net => &mut dev.net_programmed,
            Self::App => &mut dev.app_programmed,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Reboot => "reboot",
            Self::Net => "net",
            Self::App => "app",
        };
        f.pad(s)
    }
}

/// Run `phase` on `dev` and record its outcome
pub fn run_phase<P: Programmer + ?Sized>(programmer: &P, dev: &mut DeviceDescriptor, phase: Phase) {
    run_phase_with_progress(programmer, dev, phase, &NoProgress);
}

/// Run `phase` on `dev`, reporting start and finish to `progress`
///
/// # Panics
///
/// Panics if `Net` or `App` is requested for a device with no image for
/// that core. The orchestrator never dispatches such work, so this is a
/// dispatch bug rather than a device failure.
pub fn run_phase_with_progress<P, R>(
    programmer: &P,
    dev: &mut DeviceDescriptor,
    phase: Phase,
    progress: &R,
) where
    P: Programmer + ?Sized,
    R: FleetProgress + ?Sized,
{
    let snr = dev.probe_serial;
    progress.phase_started(snr, phase);

    let succeeded = match phase {
        Phase::Reboot => {
            log::info!("Rebooting dev snr: {}", snr);
            report(snr, phase, programmer.reset(snr))
        }
        Phase::Net => {
            let Some(image) = dev.net_image() else {
                panic!("net phase dispatched for {} without a net core image", snr);
            };
            log::info!("Programming net on dev snr: {}", snr);
            report(
                snr,
                phase,
                programmer.program(CoreTarget::Network, image, snr, EraseStrategy::SectorErase),
            )
        }
        Phase::App => {
            let Some(image) = dev.app_image() else {
                panic!("app phase dispatched for {} without an app core image", snr);
            };
            log::info!("Programming app on dev snr: {}", snr);
            let erase = EraseStrategy::ChipErase;
            let programmed = report(
                snr,
                phase,
                programmer.program(CoreTarget::Application, image, snr, erase),
            );
            // Chip erase wipes UICR, so it is only repopulated after a
            // successful program.
            programmed && report(snr, phase, uicr::write_device_config(programmer, dev))
        }
    };

    let status = if succeeded {
        StatusFlag::Done
    } else {
        StatusFlag::Failed
    };
    *phase.status_mut(dev) = status;

    if let Err(e) = programmer.reset(snr) {
        log::debug!("{}: post-{} reset failed: {}", snr, phase, e);
    }

    progress.phase_finished(snr, phase, status);
}

fn report(snr: u32, phase: Phase, result: crate::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::error!("{}: {} phase failed: {}", snr, phase, e);
            false
        }
    }
}
