//! Device descriptors and status flags
//!
//! A [`DeviceDescriptor`] is built once per run (from the device file and
//! command line), handed to the fleet orchestrator, and inspected afterwards
//! to find out which phase failed on which device.

use core::fmt;
use core::str::FromStr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Outcome of one phase on one device
///
/// Each of `reboot_only`, `net_programmed` and `app_programmed` carries its
/// own flag; they are never shared between fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFlag {
    /// Phase not requested
    #[default]
    NotSelected,
    /// Phase requested, not yet run
    Pending,
    /// Phase ran successfully
    Done,
    /// Phase ran and failed
    Failed,
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotSelected => "Not selected",
            Self::Pending => "Selected TBD",
            Self::Done => "Selected done",
            Self::Failed => "Selected ERR",
        };
        f.pad(s)
    }
}

/// Kind of development kit firmware a device runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Headset; needs a left/right channel written to UICR
    Headset,
    /// Gateway (broadcast source / central)
    Gateway,
}

impl DeviceKind {
    /// Whether this kind needs a stereo channel assignment
    pub fn requires_channel(self) -> bool {
        matches!(self, Self::Headset)
    }

    /// Lowercase name, as used in device files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headset => "headset",
            Self::Gateway => "gateway",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "headset" => Ok(Self::Headset),
            "gateway" => Ok(Self::Gateway),
            other => Err(Error::Config(format!("unknown device kind '{}'", other))),
        }
    }
}

/// Headset stereo channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Left earpiece
    Left,
    /// Right earpiece
    Right,
}

impl FromStr for Channel {
    type Err = Error;

    /// Parse exactly `"left"` or `"right"`; no trimming or case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(Error::InvalidChannel(other.to_string())),
        }
    }
}

/// One physical device attached through its own debug probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Serial number of the attached debug probe (SEGGER J-Link)
    pub probe_serial: u32,
    /// Whether the probe is attached; disconnected devices are skipped
    pub connected: bool,
    /// Device kind
    pub kind: DeviceKind,
    /// "left", "right" or empty. Validated only when UICR is written.
    pub channel: String,
    /// Set to `Pending` to reset the device instead of programming it
    pub reboot_only: StatusFlag,
    /// Application core image
    pub app_image: Option<PathBuf>,
    /// Network core image
    pub net_image: Option<PathBuf>,
    /// Outcome of the application core phase
    pub app_programmed: StatusFlag,
    /// Outcome of the network core phase
    pub net_programmed: StatusFlag,
}

impl DeviceDescriptor {
    /// Create a connected descriptor with no images and all flags unselected
    pub fn new(probe_serial: u32, kind: DeviceKind, channel: impl Into<String>) -> Self {
        Self {
            probe_serial,
            connected: true,
            kind,
            channel: channel.into(),
            reboot_only: StatusFlag::NotSelected,
            app_image: None,
            net_image: None,
            app_programmed: StatusFlag::NotSelected,
            net_programmed: StatusFlag::NotSelected,
        }
    }

    /// Application core image, if one is set and non-empty
    pub fn app_image(&self) -> Option<&Path> {
        non_empty(self.app_image.as_deref())
    }

    /// Network core image, if one is set and non-empty
    pub fn net_image(&self) -> Option<&Path> {
        non_empty(self.net_image.as_deref())
    }

    /// Whether any phase on this device failed
    pub fn has_failure(&self) -> bool {
        self.reboot_only == StatusFlag::Failed
            || self.net_programmed == StatusFlag::Failed
            || self.app_programmed == StatusFlag::Failed
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Whether any device in the fleet has a failed phase
///
/// `program_fleet` does not return an aggregate result; callers scan the
/// descriptors, and this is the scan the CLI uses for its exit status.
pub fn fleet_failed(devices: &[DeviceDescriptor]) -> bool {
    devices.iter().any(DeviceDescriptor::has_failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dev = DeviceDescriptor::new(1000, DeviceKind::Headset, "left");
        assert!(dev.connected);
        assert_eq!(dev.reboot_only, StatusFlag::NotSelected);
        assert_eq!(dev.app_programmed, StatusFlag::NotSelected);
        assert_eq!(dev.net_programmed, StatusFlag::NotSelected);
        assert!(dev.app_image().is_none());
        assert!(!dev.has_failure());
    }

    #[test]
    fn test_empty_image_path_is_no_image() {
        let mut dev = DeviceDescriptor::new(1000, DeviceKind::Gateway, "");
        dev.app_image = Some(PathBuf::new());
        dev.net_image = Some(PathBuf::from("net.hex"));
        assert!(dev.app_image().is_none());
        assert_eq!(dev.net_image(), Some(Path::new("net.hex")));
    }

    #[test]
    fn test_channel_parse_is_exact() {
        assert_eq!("left".parse::<Channel>().unwrap(), Channel::Left);
        assert_eq!("right".parse::<Channel>().unwrap(), Channel::Right);
        assert!("".parse::<Channel>().is_err());
        assert!("Left".parse::<Channel>().is_err());
        assert!(" left".parse::<Channel>().is_err());
    }

    #[test]
    fn test_device_kind() {
        assert!(DeviceKind::Headset.requires_channel());
        assert!(!DeviceKind::Gateway.requires_channel());
        assert_eq!(
            "gateway".parse::<DeviceKind>().unwrap(),
            DeviceKind::Gateway
        );
        assert!("speaker".parse::<DeviceKind>().is_err());
    }

    #[test]
    fn test_fleet_failed() {
        let mut a = DeviceDescriptor::new(1, DeviceKind::Headset, "left");
        let b = DeviceDescriptor::new(2, DeviceKind::Gateway, "");
        a.net_programmed = StatusFlag::Done;
        assert!(!fleet_failed(&[a.clone(), b.clone()]));

        a.app_programmed = StatusFlag::Failed;
        assert!(fleet_failed(&[a, b]));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(StatusFlag::Pending.to_string(), "Selected TBD");
        assert_eq!(StatusFlag::Failed.to_string(), "Selected ERR");
        assert_eq!(StatusFlag::default(), StatusFlag::NotSelected);
    }
}
