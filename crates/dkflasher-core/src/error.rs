//! Error types for dkflasher-core

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Headset channel is not "left" or "right"
    #[error("Channel: '{0}' does not equal 'left' or 'right'")]
    InvalidChannel(String),

    /// Programmer tool ran but exited with a non-zero status
    #[error("{operation} failed for probe {probe_serial} (exit status: {})", fmt_code(*.code))]
    ToolFailed {
        /// Short name of the invocation (e.g. "program", "memwr", "reset")
        operation: &'static str,
        /// Serial number of the targeted debug probe
        probe_serial: u32,
        /// Exit code, if the tool exited normally
        code: Option<i32>,
    },

    /// Programmer tool could not be started
    #[error("Failed to launch {tool}: {source}")]
    Spawn {
        /// Tool that failed to start
        tool: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Invalid device configuration
    #[error("Invalid device configuration: {0}")]
    Config(String),

    /// Failed to read a device file
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Device file is not valid TOML
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn fmt_code(code: Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
