//! dkflasher - Program fleets of nRF5340 Audio DKs
//!
//! Every development kit sits behind its own J-Link probe. A device file
//! lists the kits by probe serial number; dkflasher programs the network
//! cores of all selected kits in parallel, waits for every one of them, and
//! then programs the application cores (writing channel and serial number
//! into UICR) in a second parallel round.
//!
//! # Architecture
//!
//! - `dkflasher-core` holds the descriptors, the phase executor and the
//!   fleet orchestrator, all written against the `Programmer` trait
//! - Backends (`nrfjprog`, `dummy`) implement `Programmer` and are picked
//!   with `--programmer`

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};
use commands::program::ImageArgs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still overrides the verbosity flags
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Program {
            select,
            app_hex,
            net_hex,
        } => {
            let programmer = programmers::open_programmer(&cli.programmer)?;
            let images = ImageArgs { app_hex, net_hex };
            commands::program::run_program(&programmer, &select, &images)
        }
        Commands::Reboot { select } => {
            let programmer = programmers::open_programmer(&cli.programmer)?;
            commands::program::run_reboot(&programmer, &select)
        }
        Commands::ListDevices { devices } => commands::list_devices(&devices),
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
    }
}
