//! Recording programmer used by the unit tests

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::programmer::{CoreTarget, EraseStrategy, Programmer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ProgramNet,
    ProgramApp,
    WriteRegister,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Program {
        core: CoreTarget,
        image: PathBuf,
        snr: u32,
        erase: EraseStrategy,
    },
    WriteRegister {
        address: u32,
        value: u32,
        snr: u32,
    },
    Reset {
        snr: u32,
    },
}

impl Call {
    pub fn op(&self) -> Op {
        match self {
            Self::Program {
                core: CoreTarget::Network,
                ..
            } => Op::ProgramNet,
            Self::Program { .. } => Op::ProgramApp,
            Self::WriteRegister { .. } => Op::WriteRegister,
            Self::Reset { .. } => Op::Reset,
        }
    }

    pub fn snr(&self) -> u32 {
        match self {
            Self::Program { snr, .. } | Self::WriteRegister { snr, .. } | Self::Reset { snr } => {
                *snr
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin(Call),
    End(Call),
}

#[derive(Default)]
pub struct FakeProgrammer {
    events: Mutex<Vec<Event>>,
    failures: HashSet<(Op, u32)>,
    delay: Option<(Op, Duration)>,
}

impl FakeProgrammer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `op` invocation for `snr` exit non-zero
    pub fn fail(mut self, op: Op, snr: u32) -> Self {
        self.failures.insert((op, snr));
        self
    }

    /// Sleep inside every `op` invocation
    pub fn delay(mut self, op: Op, duration: Duration) -> Self {
        self.delay = Some((op, duration));
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Calls in the order they began
    pub fn calls(&self) -> Vec<Call> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Begin(c) => Some(c),
                Event::End(_) => None,
            })
            .collect()
    }

    pub fn calls_for(&self, snr: u32) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.snr() == snr)
            .collect()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls().iter().filter(|c| c.op() == op).count()
    }

    fn invoke(&self, call: Call, operation: &'static str) -> Result<()> {
        let op = call.op();
        let snr = call.snr();
        self.events.lock().unwrap().push(Event::Begin(call.clone()));
        if let Some((delayed, duration)) = self.delay {
            if delayed == op {
                std::thread::sleep(duration);
            }
        }
        self.events.lock().unwrap().push(Event::End(call));

        if self.failures.contains(&(op, snr)) {
            Err(Error::ToolFailed {
                operation,
                probe_serial: snr,
                code: Some(1),
            })
        } else {
            Ok(())
        }
    }
}

impl Programmer for FakeProgrammer {
    fn program(
        &self,
        core: CoreTarget,
        image: &Path,
        probe_serial: u32,
        erase: EraseStrategy,
    ) -> Result<()> {
        self.invoke(
            Call::Program {
                core,
                image: image.to_path_buf(),
                snr: probe_serial,
                erase,
            },
            "program",
        )
    }

    fn write_register(&self, address: u32, value: u32, probe_serial: u32) -> Result<()> {
        self.invoke(
            Call::WriteRegister {
                address,
                value,
                snr: probe_serial,
            },
            "memwr",
        )
    }

    fn reset(&self, probe_serial: u32) -> Result<()> {
        self.invoke(Call::Reset { snr: probe_serial }, "reset")
    }
}
