//! dkflasher-nrfjprog - nrfjprog backend
//!
//! Drives Nordic's `nrfjprog` command-line tool, one process per
//! invocation. `nrfjprog` addresses each J-Link by its serial number, so
//! concurrent invocations for different devices are independent.
//!
//! # Usage with dkflasher CLI
//!
//! ```bash
//! # nrfjprog from PATH
//! dkflasher program --devices devices.toml --app-hex app.hex --net-hex net.hex
//!
//! # Explicit tool location
//! dkflasher -p nrfjprog:path=/opt/nrf-command-line-tools/bin/nrfjprog program ...
//! ```

pub mod device;
pub mod error;

pub use device::{parse_options, Nrfjprog, NrfjprogConfig};
pub use error::{NrfjprogError, Result};

/// Open an nrfjprog backend from programmer-string options
///
/// # Example Options
///
/// - `path=/usr/local/bin/nrfjprog` - Optional: executable to run
pub fn open_nrfjprog(
    options: &[(&str, &str)],
) -> std::result::Result<Box<dyn dkflasher_core::Programmer + Sync>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    log::debug!("Using nrfjprog at {}", config.path.display());
    Ok(Box::new(Nrfjprog::new(config)))
}
