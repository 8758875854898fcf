//! TOML device file parsing
//!
//! Lists the development kits attached to the host:
//!
//! ```toml
//! [[device]]
//! snr = 1050012345
//! kind = "headset"
//! channel = "left"
//!
//! [[device]]
//! snr = 0x3E95A7F1
//! kind = "gateway"
//! connected = false
//! app_hex = "build/gateway/app.hex"
//! net_hex = "build/gateway/net.hex"
//! ```
//!
//! `connected` defaults to `true`. Image paths are optional; the command
//! line usually supplies them for every selected device.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::device::{DeviceDescriptor, DeviceKind};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDeviceFile {
    #[serde(default)]
    device: Vec<TomlDevice>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDevice {
    #[serde(deserialize_with = "deserialize_serial")]
    snr: u32,
    kind: DeviceKind,
    #[serde(default)]
    channel: String,
    #[serde(default = "default_connected")]
    connected: bool,
    app_hex: Option<PathBuf>,
    net_hex: Option<PathBuf>,
}

fn default_connected() -> bool {
    true
}

/// Deserialize a serial number that can be an integer, or a hex/decimal string
fn deserialize_serial<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrStr {
        Int(u32),
        Str(String),
    }

    match IntOrStr::deserialize(deserializer)? {
        IntOrStr::Int(n) => Ok(n),
        IntOrStr::Str(s) => parse_serial(&s).map_err(serde::de::Error::custom),
    }
}

/// Parse a probe serial number, decimal or `0x` hex
pub fn parse_serial(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex serial: {}", e))
    } else {
        s.parse().map_err(|e| format!("invalid serial: {}", e))
    }
}

impl From<TomlDevice> for DeviceDescriptor {
    fn from(entry: TomlDevice) -> Self {
        let mut dev = DeviceDescriptor::new(entry.snr, entry.kind, entry.channel);
        dev.connected = entry.connected;
        dev.app_image = entry.app_hex;
        dev.net_image = entry.net_hex;
        dev
    }
}

/// Parse device descriptors from a TOML string
pub fn parse_devices(content: &str) -> Result<Vec<DeviceDescriptor>> {
    let file: TomlDeviceFile = toml::from_str(content)?;

    let mut seen = HashSet::new();
    for entry in &file.device {
        if !seen.insert(entry.snr) {
            return Err(Error::Config(format!(
                "probe serial {} listed more than once",
                entry.snr
            )));
        }
    }

    Ok(file
        .device
        .into_iter()
        .map(DeviceDescriptor::from)
        .collect())
}

/// Load device descriptors from a TOML file
pub fn load_devices(path: &Path) -> Result<Vec<DeviceDescriptor>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let devices = parse_devices(&content)?;
    log::debug!("Loaded {} device(s) from {}", devices.len(), path.display());
    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::StatusFlag;
    use std::io::Write;

    #[test]
    fn test_parse_serial() {
        assert_eq!(parse_serial("1050012345").unwrap(), 1050012345);
        assert_eq!(parse_serial("0x10").unwrap(), 16);
        assert_eq!(parse_serial(" 0XFF ").unwrap(), 255);
        assert!(parse_serial("snr").is_err());
    }

    #[test]
    fn test_parse_devices() {
        let toml = r#"
[[device]]
snr = 1050012345
kind = "headset"
channel = "left"

[[device]]
snr = "0x3E95A7F1"
kind = "gateway"
connected = false
app_hex = "gw/app.hex"
"#;
        let devices = parse_devices(toml).unwrap();
        assert_eq!(devices.len(), 2);

        assert_eq!(devices[0].probe_serial, 1050012345);
        assert_eq!(devices[0].kind, DeviceKind::Headset);
        assert_eq!(devices[0].channel, "left");
        assert!(devices[0].connected);
        assert_eq!(devices[0].reboot_only, StatusFlag::NotSelected);

        assert_eq!(devices[1].probe_serial, 0x3E95A7F1);
        assert!(!devices[1].connected);
        assert_eq!(devices[1].app_image(), Some(Path::new("gw/app.hex")));
        assert!(devices[1].net_image().is_none());
    }

    #[test]
    fn test_duplicate_serial_rejected() {
        let toml = r#"
[[device]]
snr = 1
kind = "gateway"

[[device]]
snr = 1
kind = "headset"
"#;
        assert!(matches!(parse_devices(toml), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let toml = r#"
[[device]]
snr = 1
kind = "speaker"
"#;
        assert!(matches!(parse_devices(toml), Err(Error::Toml(_))));
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_devices("").unwrap().is_empty());
    }

    #[test]
    fn test_load_devices() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[device]]\nsnr = 5\nkind = \"gateway\"").unwrap();

        let devices = load_devices(file.path()).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].probe_serial, 5);

        assert!(matches!(
            load_devices(Path::new("/nonexistent/devices.toml")),
            Err(Error::Io { .. })
        ));
    }
}
