//! Unit tests for the polled one-shot lane

use crate::common::{MockError, Operation, create_mock_bridge, ready_bridge};
use icm20948_aux::{Bank, Direction, Error};

#[test]
fn test_read_completes_on_first_poll() {
    let (mut bridge, interface) = ready_bridge();

    let handle = bridge
        .request_one_shot(0x0C, 0x01, Direction::Read, None)
        .unwrap();
    assert_eq!(handle.address(), 0x0C);
    assert_eq!(handle.register(), 0x01);
    assert_eq!(handle.direction(), Direction::Read);
    assert_eq!(handle.issued_at_ms(), bridge.elapsed_ms());

    let result = bridge.poll_completion(handle, 500).unwrap();
    assert_eq!(result.data, Some(0x09));
    assert_eq!(result.polls, 1);
    assert_eq!(result.elapsed_ms, 10);
    assert_eq!(interface.status_polls(), 1);
}

#[test]
fn test_completion_on_kth_poll() {
    let (mut bridge, interface) = ready_bridge();
    interface.complete_one_shot_on_poll(5);

    let handle = bridge
        .request_one_shot(0x0C, 0x00, Direction::Read, None)
        .unwrap();
    let result = bridge.poll_completion(handle, 500).unwrap();

    assert_eq!(result.data, Some(0x48));
    assert_eq!(result.polls, 5);
    assert_eq!(result.elapsed_ms, 50);
    // No status reads after the one that reported completion
    assert_eq!(interface.status_polls(), 5);
}

#[test]
fn test_timeout_after_exact_ceiling() {
    let (mut bridge, interface) = ready_bridge();
    interface.never_complete_one_shot();

    let handle = bridge
        .request_one_shot(0x0C, 0x00, Direction::Read, None)
        .unwrap();
    let start = bridge.elapsed_ms();

    assert_eq!(bridge.poll_completion(handle, 300), Err(Error::Timeout));
    assert_eq!(bridge.elapsed_ms() - start, 300);
    assert_eq!(interface.status_polls(), 30);
}

#[test]
fn test_timeout_not_multiple_of_interval() {
    let (mut bridge, interface) = ready_bridge();
    interface.never_complete_one_shot();

    let handle = bridge
        .request_one_shot(0x0C, 0x00, Direction::Read, None)
        .unwrap();
    let start = bridge.elapsed_ms();

    assert_eq!(bridge.poll_completion(handle, 25), Err(Error::Timeout));
    assert_eq!(bridge.elapsed_ms() - start, 25);
    assert_eq!(interface.status_polls(), 3);
}

#[test]
fn test_zero_timeout_polls_once() {
    let (mut bridge, interface) = ready_bridge();
    interface.never_complete_one_shot();

    let handle = bridge
        .request_one_shot(0x0C, 0x00, Direction::Read, None)
        .unwrap();
    let start = bridge.elapsed_ms();

    assert_eq!(bridge.poll_completion(handle, 0), Err(Error::Timeout));
    assert_eq!(bridge.elapsed_ms(), start);
    assert_eq!(interface.status_polls(), 1);
}

#[test]
fn test_arbitration_loss_stops_polling() {
    let (mut bridge, interface) = ready_bridge();
    interface.complete_one_shot_on_poll(10);
    interface.lose_arbitration_on_poll(3);

    let handle = bridge
        .request_one_shot(0x0C, 0x00, Direction::Read, None)
        .unwrap();

    assert_eq!(
        bridge.poll_completion(handle, 500),
        Err(Error::ArbitrationLost)
    );
    assert_eq!(interface.status_polls(), 3);
}

#[test]
fn test_absent_device_not_acknowledged() {
    let (mut bridge, interface) = ready_bridge();

    let handle = bridge
        .request_one_shot(0x0D, 0x00, Direction::Read, None)
        .unwrap();

    assert_eq!(
        bridge.poll_completion(handle, 500),
        Err(Error::NotAcknowledged)
    );
    assert_eq!(interface.status_polls(), 1);
}

#[test]
fn test_write_programs_data_before_trigger() {
    let (mut bridge, interface) = ready_bridge();

    bridge.one_shot_write(0x0C, 0x31, 0x08).unwrap();

    assert_eq!(interface.get_mag_register(0x31), 0x08);
    assert_eq!(interface.writes_to(Bank::Bank3, 0x13), vec![0x0C]);
    assert_eq!(interface.writes_to(Bank::Bank3, 0x16), vec![0x08]);

    // One trigger, after the data byte
    let ctrl = interface.writes_to(Bank::Bank3, 0x15);
    assert_eq!(ctrl.len(), 1);
    assert_ne!(ctrl[0] & 0x80, 0);

    let ops = interface.operations();
    let data_at = ops
        .iter()
        .position(|op| {
            matches!(
                op,
                Operation::WriteRegister {
                    bank: Bank::Bank3,
                    address: 0x16,
                    ..
                }
            )
        })
        .unwrap();
    let trigger_at = ops
        .iter()
        .position(|op| {
            matches!(
                op,
                Operation::WriteRegister {
                    bank: Bank::Bank3,
                    address: 0x15,
                    ..
                }
            )
        })
        .unwrap();
    assert!(data_at < trigger_at);
}

#[test]
fn test_write_result_has_no_data() {
    let (mut bridge, _interface) = ready_bridge();

    let handle = bridge
        .request_one_shot(0x0C, 0x31, Direction::Write, Some(0x02))
        .unwrap();
    let result = bridge.poll_completion(handle, 500).unwrap();

    assert_eq!(result.data, None);
    assert_eq!(result.polls, 1);
}

#[test]
fn test_read_sets_read_flag() {
    let (mut bridge, interface) = ready_bridge();

    assert_eq!(bridge.one_shot_read(0x0C, 0x00).unwrap(), 0x48);
    assert_eq!(interface.writes_to(Bank::Bank3, 0x13), vec![0x8C]);
    assert_eq!(interface.writes_to(Bank::Bank3, 0x14), vec![0x00]);
    // Reads never touch the data-out register
    assert!(interface.writes_to(Bank::Bank3, 0x16).is_empty());
}

#[test]
fn test_status_consumed_before_programming() {
    let (mut bridge, interface) = ready_bridge();

    let _ = bridge.one_shot_read(0x0C, 0x00).unwrap();

    let ops = interface.operations();
    let status_at = ops
        .iter()
        .position(|op| {
            matches!(
                op,
                Operation::ReadRegister {
                    bank: Bank::Bank0,
                    address: 0x17,
                    ..
                }
            )
        })
        .unwrap();
    let first_program_at = ops
        .iter()
        .position(|op| matches!(op, Operation::WriteRegister { bank: Bank::Bank3, .. }))
        .unwrap();
    assert!(status_at < first_program_at);
}

#[test]
fn test_invalid_requests_rejected() {
    let (mut bridge, interface) = ready_bridge();

    assert_eq!(
        bridge.request_one_shot(0x80, 0x00, Direction::Read, None),
        Err(Error::InvalidConfig)
    );
    assert_eq!(
        bridge.request_one_shot(0x0C, 0x31, Direction::Write, None),
        Err(Error::InvalidConfig)
    );
    assert!(interface.writes_to(Bank::Bank3, 0x15).is_empty());
}

#[test]
fn test_not_ready_when_disabled() {
    let (mut bridge, interface) = create_mock_bridge();
    interface.clear_operations();

    assert_eq!(
        bridge.request_one_shot(0x0C, 0x00, Direction::Read, None),
        Err(Error::NotReady)
    );
    assert_eq!(bridge.one_shot_read(0x0C, 0x00), Err(Error::NotReady));
    assert!(interface.operations().is_empty());
}

#[test]
fn test_bus_error_while_polling() {
    let (mut bridge, interface) = ready_bridge();
    interface.complete_one_shot_on_poll(3);

    let handle = bridge
        .request_one_shot(0x0C, 0x00, Direction::Read, None)
        .unwrap();
    interface.fail_next_read();

    assert_eq!(
        bridge.poll_completion(handle, 500),
        Err(Error::Bus(MockError::Communication))
    );
}

#[test]
fn test_configured_ceiling_used_by_convenience_reads() {
    let (mut bridge, interface) = ready_bridge();
    interface.never_complete_one_shot();

    let mut config = *bridge.config();
    config.poll_timeout_ms = 50;
    bridge.set_config(config);

    let start = bridge.elapsed_ms();
    assert_eq!(bridge.one_shot_read(0x0C, 0x00), Err(Error::Timeout));
    assert_eq!(bridge.elapsed_ms() - start, 50);
    assert_eq!(interface.status_polls(), 5);
}
