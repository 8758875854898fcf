//! `program` and `reboot` commands

use std::path::PathBuf;

use dkflasher_core::{config, fleet, fleet_failed, DeviceDescriptor, DeviceKind, StatusFlag};

use super::progress::IndicatifProgress;
use crate::cli::{KindArg, SelectArgs};
use crate::programmers::BoxedProgrammer;

/// Images to program, overriding the device file
#[derive(Debug, Clone, Default)]
pub struct ImageArgs {
    pub app_hex: Option<PathBuf>,
    pub net_hex: Option<PathBuf>,
}

fn is_selected(dev: &DeviceDescriptor, select: &SelectArgs) -> bool {
    let kind_matches = match select.kind {
        KindArg::Both => true,
        KindArg::Headset => dev.kind == DeviceKind::Headset,
        KindArg::Gateway => dev.kind == DeviceKind::Gateway,
    };
    kind_matches && (select.snr.is_empty() || select.snr.contains(&dev.probe_serial))
}

/// Prepare descriptors for a programming run
///
/// Selected devices take the command-line images where given, otherwise
/// the ones from the device file. Unselected devices lose their images so
/// the orchestrator has no work for them. Returns the number selected.
pub fn select_for_program(
    devices: &mut [DeviceDescriptor],
    select: &SelectArgs,
    images: &ImageArgs,
) -> usize {
    let mut selected = 0;
    for dev in devices.iter_mut() {
        if !is_selected(dev, select) {
            dev.app_image = None;
            dev.net_image = None;
            continue;
        }

        selected += 1;
        if let Some(app) = &images.app_hex {
            dev.app_image = Some(app.clone());
        }
        if let Some(net) = &images.net_hex {
            dev.net_image = Some(net.clone());
        }
        if dev.connected && dev.app_image().is_none() && dev.net_image().is_none() {
            log::warn!(
                "{}: selected but no image given for either core",
                dev.probe_serial
            );
        }
    }
    selected
}

/// Prepare descriptors for a reboot-only run. Returns the number selected.
pub fn select_for_reboot(devices: &mut [DeviceDescriptor], select: &SelectArgs) -> usize {
    let mut selected = 0;
    for dev in devices.iter_mut() {
        dev.app_image = None;
        dev.net_image = None;
        if is_selected(dev, select) {
            dev.reboot_only = StatusFlag::Pending;
            selected += 1;
        }
    }
    selected
}

/// Run the program command
pub fn run_program(
    programmer: &BoxedProgrammer,
    select: &SelectArgs,
    images: &ImageArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut devices = config::load_devices(&select.devices)?;
    let selected = select_for_program(&mut devices, select, images);
    run_fleet(programmer, devices, selected, select.sequential)
}

/// Run the reboot command
pub fn run_reboot(
    programmer: &BoxedProgrammer,
    select: &SelectArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut devices = config::load_devices(&select.devices)?;
    let selected = select_for_reboot(&mut devices, select);
    run_fleet(programmer, devices, selected, select.sequential)
}

fn run_fleet(
    programmer: &BoxedProgrammer,
    mut devices: Vec<DeviceDescriptor>,
    selected: usize,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if selected == 0 {
        return Err("No devices match the selection".into());
    }
    log::info!(
        "{} of {} device(s) selected{}",
        selected,
        devices.len(),
        if sequential { " (sequential)" } else { "" }
    );

    let progress = IndicatifProgress::new();
    fleet::program_fleet_with_progress(&**programmer, &mut devices, sequential, &progress);

    println!();
    print_summary(&devices);

    if fleet_failed(&devices) {
        let failed = devices.iter().filter(|d| d.has_failure()).count();
        return Err(format!("{} device(s) failed", failed).into());
    }
    Ok(())
}

/// Print one row per device with its phase outcomes
pub fn print_summary(devices: &[DeviceDescriptor]) {
    println!(
        "{:<12} {:<10} {:<10} {:<14} {:<14} {:<14}",
        "snr", "device", "channel", "only reboot", "core app", "core net"
    );
    println!("{}", "-".repeat(79));

    for dev in devices {
        let snr = if dev.connected {
            dev.probe_serial.to_string()
        } else {
            format!("{}*", dev.probe_serial)
        };
        println!(
            "{:<12} {:<10} {:<10} {:<14} {:<14} {:<14}",
            snr, dev.kind, dev.channel, dev.reboot_only, dev.app_programmed, dev.net_programmed
        );
    }

    if devices.iter().any(|d| !d.connected) {
        println!();
        println!("* not connected, skipped");
    }
}
