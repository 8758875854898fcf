//! Error types for the nrfjprog backend

use std::io;
use thiserror::Error;

/// nrfjprog-specific errors
#[derive(Debug, Error)]
pub enum NrfjprogError {
    /// The nrfjprog executable could not be started
    #[error("Failed to launch '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// nrfjprog exited with a non-zero status
    #[error("nrfjprog {operation} failed for snr {snr} (exit code {code:?})")]
    ExitStatus {
        operation: &'static str,
        snr: u32,
        code: Option<i32>,
    },

    /// Invalid backend option
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },
}

/// Result type for nrfjprog operations
pub type Result<T> = std::result::Result<T, NrfjprogError>;

impl From<NrfjprogError> for dkflasher_core::Error {
    fn from(e: NrfjprogError) -> Self {
        match e {
            NrfjprogError::Spawn { tool, source } => dkflasher_core::Error::Spawn { tool, source },
            NrfjprogError::ExitStatus {
                operation,
                snr,
                code,
            } => dkflasher_core::Error::ToolFailed {
                operation,
                probe_serial: snr,
                code,
            },
            NrfjprogError::InvalidParameter { name, message } => dkflasher_core::Error::Config(
                format!("invalid nrfjprog parameter '{}': {}", name, message),
            ),
        }
    }
}
