//! CLI argument parsing

use crate::programmers;
use clap::{Parser, Subcommand};
use dkflasher_core::config::parse_serial;
use std::path::PathBuf;

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Programmer backend, optionally with parameters (name:key=value,...) [available: {}]",
        programmers::programmer_names_short()
    )
}

#[derive(Parser)]
#[command(name = "dkflasher")]
#[command(author, version, about = "Program fleets of nRF5340 Audio DKs", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short, long, global = true, default_value = "nrfjprog", help = programmer_help())]
    pub programmer: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Device kind selectable on the command line
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    /// Headsets only
    Headset,
    /// Gateways only
    Gateway,
    /// Every device in the file
    Both,
}

/// Device selection shared across commands
#[derive(clap::Args, Debug, Clone)]
pub struct SelectArgs {
    /// Device file (TOML) listing the attached kits
    #[arg(short, long)]
    pub devices: PathBuf,

    /// Only operate on devices of this kind
    #[arg(short, long, value_enum, default_value_t = KindArg::Both)]
    pub kind: KindArg,

    /// Only operate on these probe serials (comma-separated, decimal or 0x hex)
    #[arg(long, value_delimiter = ',', value_parser = parse_serial)]
    pub snr: Vec<u32>,

    /// Run one device at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Program the selected devices (net core, then app core and UICR)
    Program {
        #[command(flatten)]
        select: SelectArgs,

        /// Application core image (overrides app_hex from the device file)
        #[arg(long)]
        app_hex: Option<PathBuf>,

        /// Network core image (overrides net_hex from the device file)
        #[arg(long)]
        net_hex: Option<PathBuf>,
    },

    /// Reset the selected devices without programming them
    Reboot {
        #[command(flatten)]
        select: SelectArgs,
    },

    /// Show the devices listed in a device file
    ListDevices {
        /// Device file (TOML)
        #[arg(short, long)]
        devices: PathBuf,
    },

    /// List supported programmer backends
    ListProgrammers,
}
