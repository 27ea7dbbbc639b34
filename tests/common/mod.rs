//! Common test utilities and mock implementations

pub mod test_utils;

pub use mock_interface::Operation;
pub use test_utils::{create_mock_driver, create_mock_driver_with_config};
