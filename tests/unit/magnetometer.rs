//! Unit tests for the AK09916 magnetometer behind the auxiliary bus

use crate::common::ready_bridge;
use icm20948_aux::{ContinuousLane, Error, MagConfig, MagMode, MagSnapshot, MirrorRegion};

#[test]
fn test_identity_read() {
    let (mut bridge, _interface) = ready_bridge();

    assert_eq!(bridge.read_magnetometer_identity().unwrap(), [0x48, 0x09]);
    bridge.verify_magnetometer().unwrap();
}

#[test]
fn test_identity_mismatch() {
    let (mut bridge, interface) = ready_bridge();
    interface.set_mag_identity(0x48, 0x00);

    assert_eq!(
        bridge.verify_magnetometer(),
        Err(Error::IdentityMismatch {
            expected: 0x09,
            actual: 0x00
        })
    );
}

#[test]
fn test_soft_reset() {
    let (mut bridge, interface) = ready_bridge();
    bridge.one_shot_write(0x0C, 0x31, 0x08).unwrap();
    assert_eq!(interface.get_mag_register(0x31), 0x08);

    let start = bridge.elapsed_ms();
    bridge.magnetometer_soft_reset().unwrap();

    assert_eq!(interface.get_mag_register(0x31), 0x00);
    // One poll interval plus the reset wait
    assert_eq!(bridge.elapsed_ms() - start, 110);
}

#[test]
fn test_set_mode_reads_back() {
    let (mut bridge, interface) = ready_bridge();

    bridge.set_magnetometer_mode(MagMode::Continuous50Hz).unwrap();
    assert_eq!(interface.get_mag_register(0x31), 0x06);
}

#[test]
fn test_mode_mismatch() {
    let (mut bridge, interface) = ready_bridge();
    interface.lock_mag_mode();

    assert_eq!(
        bridge.set_magnetometer_mode(MagMode::Continuous100Hz),
        Err(Error::ModeMismatch(0x00))
    );
}

#[test]
fn test_init_and_stream() {
    let (mut bridge, interface) = ready_bridge();

    let region = bridge.init_magnetometer(MagConfig::default()).unwrap();
    assert_eq!(region, MirrorRegion { offset: 0, len: 9 });
    assert_eq!(interface.get_mag_register(0x31), 0x08);

    interface.set_mag_measurement(100, -200, 300, 0x01, 0x00);
    interface.refresh_mirror();

    let snapshot = bridge
        .read_magnetometer_snapshot(ContinuousLane::Lane0)
        .unwrap();
    assert_eq!(snapshot.x, 100);
    assert_eq!(snapshot.y, -200);
    assert_eq!(snapshot.z, 300);
    assert!(snapshot.data_ready());
    assert!(snapshot.is_fresh());
}

#[test]
fn test_stale_and_overflowed_samples() {
    let (mut bridge, interface) = ready_bridge();
    bridge
        .start_magnetometer_mirror(ContinuousLane::Lane2)
        .unwrap();

    interface.set_mag_measurement(1, 2, 3, 0x00, 0x00);
    interface.refresh_mirror();
    let stale = bridge
        .read_magnetometer_snapshot(ContinuousLane::Lane2)
        .unwrap();
    assert!(!stale.is_fresh());

    interface.set_mag_measurement(1, 2, 3, 0x03, 0x08);
    interface.refresh_mirror();
    let overflowed = bridge
        .read_magnetometer_snapshot(ContinuousLane::Lane2)
        .unwrap();
    assert!(overflowed.overrun());
    assert!(overflowed.overflow());
    assert!(!overflowed.is_fresh());
}

#[test]
fn test_snapshot_needs_full_lane() {
    let (mut bridge, _interface) = ready_bridge();
    bridge
        .configure_continuous_mirror(ContinuousLane::Lane0, 0x0C, 0x10, 4)
        .unwrap();

    assert_eq!(
        bridge.read_magnetometer_snapshot(ContinuousLane::Lane0),
        Err(Error::InvalidConfig)
    );
}

#[test]
fn test_snapshot_decoding() {
    let bytes = [0x01, 0x34, 0x12, 0xFF, 0xFF, 0x00, 0x80, 0x00, 0x00];
    let snapshot = MagSnapshot::from_bytes(&bytes);

    assert_eq!(snapshot.x, 0x1234);
    assert_eq!(snapshot.y, -1);
    assert_eq!(snapshot.z, i16::MIN);
    assert!(snapshot.is_fresh());
}

#[test]
fn test_config_for_sample_rate() {
    let config = MagConfig::for_sample_rate(20);
    assert_eq!(config.mode, MagMode::Continuous20Hz);
    assert_eq!(config.lane, ContinuousLane::Lane0);
    assert_eq!(MagMode::for_sample_rate(5), MagMode::Continuous10Hz);
    assert_eq!(MagMode::Continuous20Hz.sample_rate_hz(), Some(20));
    assert!(!MagMode::PowerDown.is_continuous());
}
