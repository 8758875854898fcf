//! Fleet progress display using indicatif spinners

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use dkflasher_core::{FleetProgress, Phase, StatusFlag};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Create the per-phase spinner style
fn create_spinner_style() -> Result<ProgressStyle, Box<dyn std::error::Error>> {
    Ok(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?)
}

/// One spinner per running phase, shared by all worker threads
pub struct IndicatifProgress {
    multi: MultiProgress,
    bars: Mutex<HashMap<(u32, Phase), ProgressBar>>,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetProgress for IndicatifProgress {
    fn round_started(&self, round: u8, devices: usize) {
        if devices > 0 {
            let _ = self
                .multi
                .println(format!("Round {}: {} device(s)", round, devices));
        }
    }

    fn phase_started(&self, probe_serial: u32, phase: Phase) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(create_spinner_style().unwrap_or_else(|_| ProgressStyle::default_spinner()));
        pb.set_message(format!("{}: {}...", probe_serial, phase));
        pb.enable_steady_tick(Duration::from_millis(100));

        self.bars
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert((probe_serial, phase), pb);
    }

    fn phase_finished(&self, probe_serial: u32, phase: Phase, status: StatusFlag) {
        let pb = self
            .bars
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&(probe_serial, phase));

        if let Some(pb) = pb {
            let outcome = match status {
                StatusFlag::Done => "done",
                _ => "FAILED",
            };
            pb.finish_with_message(format!("{}: {} {}", probe_serial, phase, outcome));
        }
    }
}
