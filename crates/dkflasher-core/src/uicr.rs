//! UICR configuration writes
//!
//! After the application core is programmed (with a full chip erase, which
//! also clears UICR) the firmware expects its identity and, for headsets,
//! its stereo channel in the customer area of UICR. The addresses and values
//! below are read back by the device firmware and must not change.

use crate::device::{Channel, DeviceDescriptor};
use crate::error::Result;
use crate::programmer::Programmer;

/// UICR word holding the probe serial number
pub const UICR_SERIAL_ADDR: u32 = 0x00FF_80F0;

/// UICR word holding the headset channel
pub const UICR_CHANNEL_ADDR: u32 = 0x00FF_80F4;

/// Encoded value for the left channel
pub const UICR_CHANNEL_LEFT: u32 = 0;

/// Encoded value for the right channel
pub const UICR_CHANNEL_RIGHT: u32 = 1;

impl Channel {
    /// Value stored at [`UICR_CHANNEL_ADDR`] for this channel
    pub fn uicr_value(self) -> u32 {
        match self {
            Self::Left => UICR_CHANNEL_LEFT,
            Self::Right => UICR_CHANNEL_RIGHT,
        }
    }
}

/// Write channel (headsets only) and identity into the device's UICR
///
/// For kinds that need a channel, the channel string is validated before
/// anything is written; an invalid value aborts with no invocation at all.
/// A failed channel write aborts before the identity write. Returns `Ok`
/// only if every invocation that was attempted succeeded.
pub fn write_device_config<P: Programmer + ?Sized>(
    programmer: &P,
    dev: &DeviceDescriptor,
) -> Result<()> {
    let snr = dev.probe_serial;

    if dev.kind.requires_channel() {
        let channel = dev.channel.parse::<Channel>()?;

        log::debug!("{}: writing channel {:?} to UICR", snr, channel);
        programmer.write_register(UICR_CHANNEL_ADDR, channel.uicr_value(), snr)?;
    }

    log::debug!("{}: writing serial number to UICR", snr);
    programmer.write_register(UICR_SERIAL_ADDR, snr, snr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceKind;
    use crate::error::Error;
    use crate::testing::{Call, FakeProgrammer, Op};

    #[test]
    fn test_headset_left() {
        let fake = FakeProgrammer::new();
        let dev = DeviceDescriptor::new(1050012345, DeviceKind::Headset, "left");
        write_device_config(&fake, &dev).unwrap();

        assert_eq!(
            fake.calls(),
            vec![
                Call::WriteRegister {
                    address: UICR_CHANNEL_ADDR,
                    value: UICR_CHANNEL_LEFT,
                    snr: 1050012345,
                },
                Call::WriteRegister {
                    address: UICR_SERIAL_ADDR,
                    value: 1050012345,
                    snr: 1050012345,
                },
            ]
        );
    }

    #[test]
    fn test_headset_right() {
        let fake = FakeProgrammer::new();
        let dev = DeviceDescriptor::new(42, DeviceKind::Headset, "right");
        write_device_config(&fake, &dev).unwrap();

        assert_eq!(
            fake.calls()[0],
            Call::WriteRegister {
                address: UICR_CHANNEL_ADDR,
                value: UICR_CHANNEL_RIGHT,
                snr: 42,
            }
        );
        assert_eq!(fake.count(Op::WriteRegister), 2);
    }

    #[test]
    fn test_invalid_channel_writes_nothing() {
        for channel in ["", "center", "LEFT"] {
            let fake = FakeProgrammer::new();
            let dev = DeviceDescriptor::new(42, DeviceKind::Headset, channel);
            let err = write_device_config(&fake, &dev).unwrap_err();
            assert!(matches!(err, Error::InvalidChannel(ref c) if c == channel));
            assert!(fake.calls().is_empty());
        }
    }

    #[test]
    fn test_gateway_writes_identity_only() {
        let fake = FakeProgrammer::new();
        // Channel is ignored for kinds that don't need one
        let dev = DeviceDescriptor::new(7, DeviceKind::Gateway, "bogus");
        write_device_config(&fake, &dev).unwrap();

        assert_eq!(
            fake.calls(),
            vec![Call::WriteRegister {
                address: UICR_SERIAL_ADDR,
                value: 7,
                snr: 7,
            }]
        );
    }

    #[test]
    fn test_channel_write_failure_skips_identity() {
        let fake = FakeProgrammer::new().fail(Op::WriteRegister, 42);
        let dev = DeviceDescriptor::new(42, DeviceKind::Headset, "left");
        assert!(write_device_config(&fake, &dev).is_err());
        assert_eq!(fake.count(Op::WriteRegister), 1);
    }
}
