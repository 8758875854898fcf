//! dkflasher-dummy - Simulated programmer for dry runs and testing
//!
//! [`DummyProgrammer`] never touches hardware. It records every invocation
//! in order and returns a scripted outcome, which makes it useful both for
//! rehearsing a fleet run from the command line and for exercising the
//! orchestrator without probes attached.
//!
//! ```bash
//! # Dry run where the app core of one device fails to program
//! dkflasher -p dummy:fail=app@1050012345,delay=200 program --devices devices.toml --app-hex app.hex
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use dkflasher_core::{CoreTarget, EraseStrategy, Programmer};
use thiserror::Error;

/// Kind of programmer invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Program the network core
    ProgramNet,
    /// Program the application core
    ProgramApp,
    /// Register write
    WriteRegister,
    /// Reset
    Reset,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Self::ProgramNet | Self::ProgramApp => "program",
            Self::WriteRegister => "memwr",
            Self::Reset => "reset",
        }
    }
}

impl std::str::FromStr for Operation {
    type Err = DummyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "net" => Ok(Self::ProgramNet),
            "app" => Ok(Self::ProgramApp),
            "memwr" => Ok(Self::WriteRegister),
            "reset" => Ok(Self::Reset),
            other => Err(DummyError::InvalidParameter(format!(
                "unknown operation '{}' (expected net, app, memwr or reset)",
                other
            ))),
        }
    }
}

/// One recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `program` on a core
    Program {
        /// Target core
        core: CoreTarget,
        /// Image path
        image: PathBuf,
        /// Probe serial
        probe_serial: u32,
        /// Erase strategy
        erase: EraseStrategy,
    },
    /// `write_register`
    WriteRegister {
        /// Register address
        address: u32,
        /// Value written
        value: u32,
        /// Probe serial
        probe_serial: u32,
    },
    /// `reset`
    Reset {
        /// Probe serial
        probe_serial: u32,
    },
}

impl Invocation {
    /// Operation kind of this invocation
    pub fn operation(&self) -> Operation {
        match self {
            Self::Program {
                core: CoreTarget::Network,
                ..
            } => Operation::ProgramNet,
            Self::Program { .. } => Operation::ProgramApp,
            Self::WriteRegister { .. } => Operation::WriteRegister,
            Self::Reset { .. } => Operation::Reset,
        }
    }

    /// Probe serial this invocation targeted
    pub fn probe_serial(&self) -> u32 {
        match self {
            Self::Program { probe_serial, .. }
            | Self::WriteRegister { probe_serial, .. }
            | Self::Reset { probe_serial } => *probe_serial,
        }
    }
}

/// Dummy backend errors
#[derive(Debug, Error)]
pub enum DummyError {
    /// Invalid backend option
    #[error("Invalid dummy parameter: {0}")]
    InvalidParameter(String),
}

/// Configuration for the dummy programmer
#[derive(Debug, Clone, Default)]
pub struct DummyConfig {
    /// Invocations that exit non-zero, keyed by operation and probe serial
    pub failures: HashSet<(Operation, u32)>,
    /// Simulated duration of each program invocation
    pub program_delay: Duration,
}

/// Simulated programmer
#[derive(Debug, Default)]
pub struct DummyProgrammer {
    config: DummyConfig,
    history: Mutex<Vec<Invocation>>,
}

impl DummyProgrammer {
    /// Create a dummy programmer with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Make `operation` fail for `probe_serial`
    pub fn with_failure(mut self, operation: Operation, probe_serial: u32) -> Self {
        self.config.failures.insert((operation, probe_serial));
        self
    }

    /// Recorded invocations, in the order they were issued
    pub fn invocations(&self) -> Vec<Invocation> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded invocations of `operation`
    pub fn count(&self, operation: Operation) -> usize {
        self.invocations()
            .iter()
            .filter(|i| i.operation() == operation)
            .count()
    }

    fn invoke(&self, invocation: Invocation) -> dkflasher_core::Result<()> {
        let operation = invocation.operation();
        let probe_serial = invocation.probe_serial();
        log::info!("dummy: {:?}", invocation);

        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(invocation);

        if matches!(operation, Operation::ProgramNet | Operation::ProgramApp)
            && !self.config.program_delay.is_zero()
        {
            std::thread::sleep(self.config.program_delay);
        }

        if self.config.failures.contains(&(operation, probe_serial)) {
            return Err(dkflasher_core::Error::ToolFailed {
                operation: operation.name(),
                probe_serial,
                code: Some(1),
            });
        }
        Ok(())
    }
}

impl Programmer for DummyProgrammer {
    fn program(
        &self,
        core: CoreTarget,
        image: &Path,
        probe_serial: u32,
        erase: EraseStrategy,
    ) -> dkflasher_core::Result<()> {
        self.invoke(Invocation::Program {
            core,
            image: image.to_path_buf(),
            probe_serial,
            erase,
        })
    }

    fn write_register(
        &self,
        address: u32,
        value: u32,
        probe_serial: u32,
    ) -> dkflasher_core::Result<()> {
        self.invoke(Invocation::WriteRegister {
            address,
            value,
            probe_serial,
        })
    }

    fn reset(&self, probe_serial: u32) -> dkflasher_core::Result<()> {
        self.invoke(Invocation::Reset { probe_serial })
    }
}

/// Parse dummy options from a programmer string
///
/// - `fail=<net|app|memwr|reset>@<snr>` - may be repeated
/// - `delay=<ms>` - simulated duration of each program invocation
pub fn parse_options(options: &[(&str, &str)]) -> Result<DummyConfig, DummyError> {
    let mut config = DummyConfig::default();

    for (key, value) in options {
        match *key {
            "fail" => {
                let (op, snr) = value.split_once('@').ok_or_else(|| {
                    DummyError::InvalidParameter(format!(
                        "fail={} (expected <operation>@<snr>)",
                        value
                    ))
                })?;
                let snr = dkflasher_core::config::parse_serial(snr)
                    .map_err(DummyError::InvalidParameter)?;
                config.failures.insert((op.parse()?, snr));
            }
            "delay" => {
                let ms: u64 = value.parse().map_err(|_| {
                    DummyError::InvalidParameter(format!("delay={} is not milliseconds", value))
                })?;
                config.program_delay = Duration::from_millis(ms);
            }
            _ => {
                log::warn!("Unknown dummy option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}

/// Open a dummy programmer from programmer-string options
pub fn open_dummy(
    options: &[(&str, &str)],
) -> Result<Box<dyn Programmer + Sync>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    Ok(Box::new(DummyProgrammer::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dkflasher_core::uicr::{UICR_CHANNEL_ADDR, UICR_CHANNEL_RIGHT, UICR_SERIAL_ADDR};
    use dkflasher_core::{fleet, DeviceDescriptor, DeviceKind, StatusFlag};

    fn headset(snr: u32, channel: &str) -> DeviceDescriptor {
        let mut dev = DeviceDescriptor::new(snr, DeviceKind::Headset, channel);
        dev.app_image = Some(PathBuf::from("app.hex"));
        dev.net_image = Some(PathBuf::from("net.hex"));
        dev
    }

    #[test]
    fn test_parse_options() {
        let options = [("fail", "app@1050012345"), ("fail", "reset@0x10")];
        let config = parse_options(&options).unwrap();
        let expected = (Operation::ProgramApp, 1050012345);
        assert!(config.failures.contains(&expected));
        assert!(config.failures.contains(&(Operation::Reset, 16)));

        let config = parse_options(&[("delay", "5")]).unwrap();
        assert_eq!(config.program_delay, Duration::from_millis(5));

        assert!(parse_options(&[("fail", "app")]).is_err());
        assert!(parse_options(&[("fail", "erase@1")]).is_err());
        assert!(parse_options(&[("delay", "soon")]).is_err());
    }

    #[test]
    fn test_records_full_device_sequence() {
        let dummy = DummyProgrammer::default();
        let mut devices = vec![headset(42, "right")];

        fleet::program_fleet(&dummy, &mut devices, true);

        assert_eq!(devices[0].net_programmed, StatusFlag::Done);
        assert_eq!(devices[0].app_programmed, StatusFlag::Done);
        assert_eq!(
            dummy.invocations(),
            vec![
                Invocation::Program {
                    core: CoreTarget::Network,
                    image: PathBuf::from("net.hex"),
                    probe_serial: 42,
                    erase: EraseStrategy::SectorErase,
                },
                Invocation::Reset { probe_serial: 42 },
                Invocation::Program {
                    core: CoreTarget::Application,
                    image: PathBuf::from("app.hex"),
                    probe_serial: 42,
                    erase: EraseStrategy::ChipErase,
                },
                Invocation::WriteRegister {
                    address: UICR_CHANNEL_ADDR,
                    value: UICR_CHANNEL_RIGHT,
                    probe_serial: 42,
                },
                Invocation::WriteRegister {
                    address: UICR_SERIAL_ADDR,
                    value: 42,
                    probe_serial: 42,
                },
                Invocation::Reset { probe_serial: 42 },
            ]
        );
    }

    #[test]
    fn test_scripted_failure() {
        let dummy = DummyProgrammer::default().with_failure(Operation::ProgramApp, 1);
        let mut devices = vec![headset(1, "left"), headset(2, "left")];

        fleet::program_fleet(&dummy, &mut devices, false);

        assert_eq!(devices[0].app_programmed, StatusFlag::Failed);
        assert_eq!(devices[1].app_programmed, StatusFlag::Done);
        // Only device 2 got its UICR written
        assert_eq!(dummy.count(Operation::WriteRegister), 2);
        assert!(dummy
            .invocations()
            .iter()
            .filter(|i| i.operation() == Operation::WriteRegister)
            .all(|i| i.probe_serial() == 2));
    }

    #[test]
    fn test_boxed_backend() {
        let programmer = open_dummy(&[("fail", "net@3")]).unwrap();
        let mut devices = vec![headset(3, "left")];

        fleet::program_fleet(&*programmer, &mut devices, false);

        assert_eq!(devices[0].net_programmed, StatusFlag::Failed);
        assert_eq!(devices[0].app_programmed, StatusFlag::Done);
    }
}
