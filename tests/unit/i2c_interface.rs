//! Unit tests for the I2C transport

use crate::common::test_utils::MockDelay;
use device_driver::RegisterInterface;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use icm20948_aux::{AuxBridge, DirectInterface, Error, I2cInterface};

/// Bus that records writes and answers every read with one byte value
#[derive(Debug, Default)]
struct RecordingBus {
    writes: Vec<(u8, Vec<u8>)>,
    read_fill: u8,
}

impl ErrorType for RecordingBus {
    type Error = ErrorKind;
}

impl I2c for RecordingBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                Operation::Read(buffer) => buffer.fill(self.read_fill),
            }
        }
        Ok(())
    }
}

#[test]
fn test_addresses() {
    assert_eq!(I2cInterface::default(RecordingBus::default()).address(), 0x68);
    assert_eq!(I2cInterface::alternative(RecordingBus::default()).address(), 0x69);
    assert_eq!(I2cInterface::new(RecordingBus::default(), 0x42).address(), 0x42);
}

#[test]
fn test_register_access_framing() {
    let bus = RecordingBus {
        read_fill: 0x5A,
        ..RecordingBus::default()
    };
    let mut interface = I2cInterface::default(bus);

    interface.write_register(0x7F, 8, &[0x30]).unwrap();
    let mut data = [0u8; 2];
    interface.read_register(0x3B, 16, &mut data).unwrap();

    assert_eq!(data, [0x5A, 0x5A]);
    let bus = interface.release();
    assert_eq!(
        bus.writes,
        vec![(0x68, vec![0x7F, 0x30]), (0x68, vec![0x3B])]
    );
}

#[test]
fn test_direct_access_uses_downstream_address() {
    let bus = RecordingBus {
        read_fill: 0x48,
        ..RecordingBus::default()
    };
    let mut interface = I2cInterface::default(bus);

    interface.write_direct(0x0C, 0x32, &[0x01]).unwrap();
    let mut wia = [0u8; 1];
    interface.read_direct(0x0C, 0x00, &mut wia).unwrap();

    assert_eq!(wia, [0x48]);
    let bus = interface.release();
    assert_eq!(
        bus.writes,
        vec![(0x0C, vec![0x32, 0x01]), (0x0C, vec![0x00])]
    );
}

#[test]
fn test_bridge_over_i2c() {
    let bus = RecordingBus {
        read_fill: 0xEA,
        ..RecordingBus::default()
    };
    let bridge = AuxBridge::new(I2cInterface::default(bus), MockDelay).unwrap();

    let (interface, _delay) = bridge.release();
    let bus = interface.release();
    // Bank 0 select, then WHO_AM_I
    assert_eq!(
        bus.writes,
        vec![(0x68, vec![0x7F, 0x00]), (0x68, vec![0x00])]
    );

    let result = AuxBridge::new(I2cInterface::default(RecordingBus::default()), MockDelay);
    assert!(matches!(result, Err(Error::InvalidDevice(0x00))));
}
