//! Progress callbacks for fleet runs
//!
//! Callbacks are invoked from the per-device worker threads, so they take
//! `&self` and implementations must be `Sync`.

use crate::device::StatusFlag;
use crate::phase::Phase;

/// Observer for a fleet programming run
pub trait FleetProgress: Sync {
    /// A round is about to dispatch `devices` units of work
    fn round_started(&self, _round: u8, _devices: usize) {}

    /// A phase started on the device behind `probe_serial`
    fn phase_started(&self, probe_serial: u32, phase: Phase);

    /// A phase finished; `status` is the flag it recorded
    fn phase_finished(&self, probe_serial: u32, phase: Phase, status: StatusFlag);

    /// All units of a round have been joined
    fn round_finished(&self, _round: u8) {}
}

/// A no-op progress reporter
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl FleetProgress for NoProgress {
    fn phase_started(&self, _probe_serial: u32, _phase: Phase) {}
    fn phase_finished(&self, _probe_serial: u32, _phase: Phase, _status: StatusFlag) {}
}
