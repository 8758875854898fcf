//! List commands implementation

use std::path::Path;

use dkflasher_core::config;

use crate::programmers;

/// List all supported programmer backends
pub fn list_programmers() {
    print!("{}", programmers::programmer_help());
}

/// Show the devices listed in a device file
pub fn list_devices(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let devices = config::load_devices(path)?;

    println!(
        "{:<12} {:<10} {:<10} {:<10} {:<24} {:<24}",
        "snr", "device", "channel", "connected", "app hex", "net hex"
    );
    println!("{}", "-".repeat(94));

    for dev in &devices {
        let show = |p: Option<&Path>| p.map(|p| p.display().to_string()).unwrap_or_default();
        println!(
            "{:<12} {:<10} {:<10} {:<10} {:<24} {:<24}",
            dev.probe_serial,
            dev.kind,
            dev.channel,
            if dev.connected { "yes" } else { "no" },
            show(dev.app_image()),
            show(dev.net_image())
        );
    }

    println!();
    println!("{} device(s)", devices.len());
    Ok(())
}
