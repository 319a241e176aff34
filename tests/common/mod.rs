//! Common test utilities and mock implementations


pub use mock_interface::{MAG_ADDRESS, MockError, MockInterface, Operation};
pub use test_utils::{create_mock_bridge, ready_bridge};
