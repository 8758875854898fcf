//! Fleet orchestration
//!
//! Programming runs in two rounds:
//!
//! 1. For every connected device: a reset if `reboot_only` is `Pending`,
//!    otherwise the network core if it has a net image.
//! 2. For every connected device not in reboot-only mode: the application
//!    core (plus UICR) if it has an app image.
//!
//! Within a round every unit of work runs on its own scoped thread; the
//! round ends only when all of them have been joined. That barrier is what
//! keeps a device's net core (and its reset cycle) strictly ahead of its app
//! core without serializing different devices.
//!
//! Each worker thread receives the only `&mut` to its descriptor, so status
//! fields are written without locking and no descriptor is ever touched by
//! two workers at once.
//!
//! Round 2 is not gated on round 1 succeeding: a device whose net core
//! failed still gets its app core programmed.

use std::thread;

use crate::device::{DeviceDescriptor, StatusFlag};
use crate::phase::{run_phase_with_progress, Phase};
use crate::programmer::Programmer;
use crate::progress::{FleetProgress, NoProgress};

/// Program every connected device, recording outcomes in the descriptors
///
/// With `sequential` set, each unit of work is joined right after it is
/// started. Final outcomes are the same; only timing differs.
pub fn program_fleet<P>(programmer: &P, devices: &mut [DeviceDescriptor], sequential: bool)
where
    P: Programmer + Sync + ?Sized,
{
    program_fleet_with_progress(programmer, devices, sequential, &NoProgress);
}

/// [`program_fleet`] with progress reporting
pub fn program_fleet_with_progress<P, R>(
    programmer: &P,
    devices: &mut [DeviceDescriptor],
    sequential: bool,
    progress: &R,
) where
    P: Programmer + Sync + ?Sized,
    R: FleetProgress + ?Sized,
{
    let skipped = devices.iter().filter(|d| !d.connected).count();
    if skipped > 0 {
        log::info!("Skipping {} disconnected device(s)", skipped);
    }

    let first: Vec<_> = devices
        .iter_mut()
        .filter(|d| d.connected)
        .filter_map(|d| first_round_phase(d).map(|phase| (d, phase)))
        .collect();
    run_round(programmer, 1, first, sequential, progress);

    let second: Vec<_> = devices
        .iter_mut()
        .filter(|d| d.connected)
        .filter_map(|d| second_round_phase(d).map(|phase| (d, phase)))
        .collect();
    run_round(programmer, 2, second, sequential, progress);
}

/// Round 1 work for a connected device
fn first_round_phase(dev: &DeviceDescriptor) -> Option<Phase> {
    if dev.reboot_only == StatusFlag::Pending {
        Some(Phase::Reboot)
    } else if dev.net_image().is_some() {
        Some(Phase::Net)
    } else {
        None
    }
}

/// Round 2 work for a connected device
fn second_round_phase(dev: &DeviceDescriptor) -> Option<Phase> {
    if dev.reboot_only == StatusFlag::NotSelected && dev.app_image().is_some() {
        Some(Phase::App)
    } else {
        None
    }
}

fn run_round<P, R>(
    programmer: &P,
    round: u8,
    work: Vec<(&mut DeviceDescriptor, Phase)>,
    sequential: bool,
    progress: &R,
) where
    P: Programmer + Sync + ?Sized,
    R: FleetProgress + ?Sized,
{
    log::info!("Round {}: {} device(s)", round, work.len());
    progress.round_started(round, work.len());

    thread::scope(|s| {
        let mut handles = Vec::with_capacity(work.len());

        for (dev, phase) in work {
            log::debug!(
                "Round {}: dispatching {} on {}",
                round,
                phase,
                dev.probe_serial
            );
            let worker = move || run_phase_with_progress(programmer, dev, phase, progress);
            let handle = s.spawn(worker);
            if sequential {
                join(handle);
            } else {
                handles.push(handle);
            }
        }

        for handle in handles {
            join(handle);
        }
    });

    progress.round_finished(round);
}

/// Join a worker, re-raising its panic on the orchestrating thread
fn join(handle: thread::ScopedJoinHandle<'_, ()>) {
    if let Err(payload) = handle.join() {
        std::panic::resume_unwind(payload);
    }
}
