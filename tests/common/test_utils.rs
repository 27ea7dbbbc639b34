//! Test utilities and helper functions

use super::mock_interface::MockInterface;
use qmc5883l::{Config, Qmc5883lDriver};

/// Create a driver with the default configuration and a fresh mock interface
///
/// The operations log is cleared after construction.
pub fn create_mock_driver() -> (Qmc5883lDriver<MockInterface>, MockInterface) {
    create_mock_driver_with_config(Config::default())
}

/// Create a driver with a custom configuration
///
/// # Panics
///
/// Panics if construction fails.
pub fn create_mock_driver_with_config(
    config: Config,
) -> (Qmc5883lDriver<MockInterface>, MockInterface) {
    let mock = MockInterface::new();
    let driver = Qmc5883lDriver::new(mock.clone(), config).expect("Failed to create driver");
    mock.clear_operations();
    (driver, mock)
}

/// Assert that two floating point values are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    assert!(
        (a - b).abs() < epsilon,
        "Values not equal: {} != {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Assert that a bearing lies in `[0, 360)`
pub fn assert_bearing_in_range(bearing: f32) {
    assert!(
        (0.0..360.0).contains(&bearing),
        "Bearing out of range: {}",
        bearing
    );
}
