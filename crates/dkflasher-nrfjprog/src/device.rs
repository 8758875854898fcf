//! nrfjprog invocation
//!
//! Every [`Programmer`] call becomes one `nrfjprog` process. Arguments are
//! passed as a list (no shell), and the child inherits stdout/stderr so the
//! tool's own output shows up interleaved with ours, as it does when run by
//! hand.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use dkflasher_core::{CoreTarget, EraseStrategy, Programmer};
use log::{debug, warn};

use crate::error::{NrfjprogError, Result};

/// Device family passed with `-f`
const FAMILY: &str = "NRF53";

/// Configuration for the nrfjprog backend
#[derive(Debug, Clone)]
pub struct NrfjprogConfig {
    /// Executable to run; resolved through `PATH` if not absolute
    pub path: PathBuf,
}

impl Default for NrfjprogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("nrfjprog"),
        }
    }
}

/// Programmer backed by the nrfjprog command-line tool
#[derive(Debug, Clone, Default)]
pub struct Nrfjprog {
    config: NrfjprogConfig,
}

impl Nrfjprog {
    /// Create a backend with the given configuration
    pub fn new(config: NrfjprogConfig) -> Self {
        Self { config }
    }

    fn run(&self, operation: &'static str, snr: u32, args: Vec<OsString>) -> Result<()> {
        debug!("{} {:?}", self.config.path.display(), args);

        let status = Command::new(&self.config.path)
            .args(&args)
            .status()
            .map_err(|source| NrfjprogError::Spawn {
                tool: self.config.path.display().to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(NrfjprogError::ExitStatus {
                operation,
                snr,
                code: status.code(),
            })
        }
    }
}

impl Programmer for Nrfjprog {
    fn program(
        &self,
        core: CoreTarget,
        image: &Path,
        probe_serial: u32,
        erase: EraseStrategy,
    ) -> dkflasher_core::Result<()> {
        let args = program_args(core, image, probe_serial, erase);
        Ok(self.run("program", probe_serial, args)?)
    }

    fn write_register(
        &self,
        address: u32,
        value: u32,
        probe_serial: u32,
    ) -> dkflasher_core::Result<()> {
        let args = memwr_args(address, value, probe_serial);
        Ok(self.run("memwr", probe_serial, args)?)
    }

    fn reset(&self, probe_serial: u32) -> dkflasher_core::Result<()> {
        Ok(self.run("reset", probe_serial, reset_args(probe_serial))?)
    }
}

/// Arguments for programming one core
pub fn program_args(
    core: CoreTarget,
    image: &Path,
    probe_serial: u32,
    erase: EraseStrategy,
) -> Vec<OsString> {
    let erase = match erase {
        EraseStrategy::SectorErase => "--sectorerase",
        EraseStrategy::ChipErase => "--chiperase",
    };
    let coprocessor = match core {
        CoreTarget::Application => "CP_APPLICATION",
        CoreTarget::Network => "CP_NETWORK",
    };

    vec![
        "--program".into(),
        image.as_os_str().to_owned(),
        "-f".into(),
        FAMILY.into(),
        "-q".into(),
        "--snr".into(),
        probe_serial.to_string().into(),
        erase.into(),
        "--coprocessor".into(),
        coprocessor.into(),
    ]
}

/// Arguments for writing one 32-bit word
pub fn memwr_args(address: u32, value: u32, probe_serial: u32) -> Vec<OsString> {
    vec![
        "--memwr".into(),
        address.to_string().into(),
        "--val".into(),
        value.to_string().into(),
        "--snr".into(),
        probe_serial.to_string().into(),
    ]
}

/// Arguments for a pin/system reset
pub fn reset_args(probe_serial: u32) -> Vec<OsString> {
    vec!["-r".into(), "--snr".into(), probe_serial.to_string().into()]
}

/// Parse nrfjprog options from a programmer string
///
/// # Example
/// ```ignore
/// let options = &[("path", "/opt/nrf-command-line-tools/bin/nrfjprog")];
/// let config = parse_options(options)?;
/// ```
pub fn parse_options(options: &[(&str, &str)]) -> Result<NrfjprogConfig> {
    let mut config = NrfjprogConfig::default();

    for (key, value) in options {
        match *key {
            "path" => {
                if value.is_empty() {
                    return Err(NrfjprogError::InvalidParameter {
                        name: "path",
                        message: "must not be empty".to_string(),
                    });
                }
                config.path = PathBuf::from(value);
            }
            _ => {
                warn!("Unknown nrfjprog option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}
