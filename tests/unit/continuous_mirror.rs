//! Unit tests for continuous lanes and the mirrored buffer

use crate::common::{Operation, create_mock_bridge, ready_bridge};
use icm20948_aux::{Bank, ContinuousLane, Error, MirrorRegion};

#[test]
fn test_lane_programming() {
    let (mut bridge, interface) = ready_bridge();

    let region = bridge
        .configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x10, 9)
        .unwrap();

    assert_eq!(region, MirrorRegion { offset: 0, len: 9 });
    assert_eq!(interface.get_register(Bank::Bank3, 0x03), 0x8C);
    assert_eq!(interface.get_register(Bank::Bank3, 0x04), 0x10);
    assert_eq!(interface.get_register(Bank::Bank3, 0x05), 0x89);
}

#[test]
fn test_lanes_packed_in_lane_order() {
    let (mut bridge, _interface) = ready_bridge();

    let lane2 = bridge
        .configure_continuous_mirror(ContinuousLane::Lane2, 0x0C, 0x00, 2)
        .unwrap();
    assert_eq!(lane2, MirrorRegion { offset: 0, len: 2 });

    let lane0 = bridge
        .configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x10, 9)
        .unwrap();
    assert_eq!(lane0, MirrorRegion { offset: 0, len: 9 });

    // A lower lane pushes the higher lanes back
    assert_eq!(
        bridge.mirror_region(ContinuousLane::Lane2),
        MirrorRegion { offset: 9, len: 2 }
    );

    bridge
        .configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x10, 3)
        .unwrap();
    assert_eq!(
        bridge.mirror_region(ContinuousLane::Lane2),
        MirrorRegion { offset: 3, len: 2 }
    );
}

#[test]
fn test_buffer_capacity() {
    let (mut bridge, _interface) = ready_bridge();

    bridge
        .configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x10, 15)
        .unwrap();
    assert_eq!(
        bridge.configure_continuous_mirror(ContinuousLane::Lane1, 0x0C, 0x00, 10),
        Err(Error::InvalidConfig)
    );
    // The rejected lane leaves the layout untouched
    assert_eq!(bridge.mirror_region(ContinuousLane::Lane1).len, 0);

    let region = bridge
        .configure_continuous_mirror(ContinuousLane::Lane1, 0x0C, 0x00, 9)
        .unwrap();
    assert_eq!(region, MirrorRegion { offset: 15, len: 9 });
}

#[test]
fn test_invalid_lane_parameters() {
    let (mut bridge, _interface) = ready_bridge();

    assert_eq!(
        bridge.configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x10, 16),
        Err(Error::InvalidConfig)
    );
    assert_eq!(
        bridge.configure_continuous_mirror(ContinuousLane::Lane0, 0x80, 0x10, 9),
        Err(Error::InvalidConfig)
    );
    assert_eq!(
        bridge.configure_continuous_write(ContinuousLane::Lane3, 0x80, 0x31, 0x08),
        Err(Error::InvalidConfig)
    );
}

#[test]
fn test_not_ready_when_disabled() {
    let (mut bridge, _interface) = create_mock_bridge();

    assert_eq!(
        bridge.configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x10, 9),
        Err(Error::NotReady)
    );
}

#[test]
fn test_mirror_follows_hardware_cycles() {
    let (mut bridge, interface) = ready_bridge();
    // Left over from an earlier configuration
    interface.set_register(Bank::Bank0, 0x3B, 0x5A);
    interface.set_register(Bank::Bank0, 0x3C, 0xA5);

    bridge
        .configure_continuous_mirror(ContinuousLane::Lane1, 0x0C, 0x00, 2)
        .unwrap();

    // The old bytes stay until the first cycle overwrites them
    let mut buffer = [0xFFu8; 2];
    assert_eq!(bridge.read_mirror(ContinuousLane::Lane1, &mut buffer).unwrap(), 2);
    assert_eq!(buffer, [0x5A, 0xA5]);

    interface.refresh_mirror();
    assert_eq!(bridge.read_mirror(ContinuousLane::Lane1, &mut buffer).unwrap(), 2);
    assert_eq!(buffer, [0x48, 0x09]);
}

#[test]
fn test_read_mirror_clamps_to_lane_length() {
    let (mut bridge, interface) = ready_bridge();
    bridge
        .configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x00, 2)
        .unwrap();
    interface.refresh_mirror();

    let mut buffer = [0u8; 8];
    assert_eq!(bridge.read_mirror(ContinuousLane::Lane0, &mut buffer).unwrap(), 2);
    assert_eq!(&buffer[..2], &[0x48, 0x09]);

    // A disabled lane has nothing to read
    assert_eq!(bridge.read_mirror(ContinuousLane::Lane3, &mut buffer).unwrap(), 0);
}

#[test]
fn test_disable_lane() {
    let (mut bridge, interface) = ready_bridge();
    bridge
        .configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x10, 9)
        .unwrap();
    bridge
        .configure_continuous_mirror(ContinuousLane::Lane1, 0x0C, 0x00, 2)
        .unwrap();

    bridge.disable_continuous_lane(ContinuousLane::Lane0).unwrap();

    assert_eq!(interface.get_register(Bank::Bank3, 0x05), 0x00);
    assert_eq!(
        bridge.mirror_region(ContinuousLane::Lane1),
        MirrorRegion { offset: 0, len: 2 }
    );
}

#[test]
fn test_zero_count_disables_lane() {
    let (mut bridge, interface) = ready_bridge();

    let region = bridge
        .configure_continuous_mirror(ContinuousLane::Lane2, 0x0C, 0x10, 0)
        .unwrap();
    assert_eq!(region.len, 0);
    assert_eq!(interface.get_register(Bank::Bank3, 0x0D) & 0x80, 0);
}

#[test]
fn test_continuous_write_lane() {
    let (mut bridge, interface) = ready_bridge();

    bridge
        .configure_continuous_write(ContinuousLane::Lane3, 0x0C, 0x31, 0x01)
        .unwrap();

    assert_eq!(interface.get_register(Bank::Bank3, 0x0F), 0x0C);
    assert_eq!(interface.get_register(Bank::Bank3, 0x10), 0x31);
    assert_eq!(interface.get_register(Bank::Bank3, 0x11), 0x81);
    assert_eq!(interface.get_register(Bank::Bank3, 0x12), 0x01);
    assert_eq!(bridge.mirror_region(ContinuousLane::Lane3).len, 0);

    interface.refresh_mirror();
    assert_eq!(interface.get_mag_register(0x31), 0x01);
}

#[test]
fn test_read_mirror_raw_bounds() {
    let (mut bridge, interface) = create_mock_bridge();
    interface.set_register(Bank::Bank0, 0x3B + 23, 0xAB);

    let mut buffer = [0u8; 24];
    bridge.read_mirror_raw(0, &mut buffer).unwrap();
    assert_eq!(buffer[23], 0xAB);

    let mut buffer = [0u8; 5];
    assert_eq!(
        bridge.read_mirror_raw(20, &mut buffer),
        Err(Error::InvalidConfig)
    );

    let mut last = [0u8; 1];
    bridge.read_mirror_raw(23, &mut last).unwrap();
    assert_eq!(last, [0xAB]);
}

#[test]
fn test_mirror_read_in_one_burst() {
    let (mut bridge, interface) = ready_bridge();
    bridge
        .configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x00, 2)
        .unwrap();
    interface.refresh_mirror();
    interface.clear_operations();

    let mut buffer = [0u8; 2];
    bridge.read_mirror(ContinuousLane::Lane0, &mut buffer).unwrap();

    // Back to bank 0, then the whole buffer in one burst
    let reads: Vec<u8> = interface
        .operations()
        .iter()
        .filter_map(|op| match *op {
            Operation::ReadRegister { address, .. } => Some(address),
            _ => None,
        })
        .collect();
    assert_eq!(reads, (0x3B..0x3B + 24).collect::<Vec<u8>>());
    assert_eq!(interface.bank_switch_count(), 1);
}
