//! Error handling tests

use crate::common::{create_mock_driver, create_mock_driver_with_config};
use crate::common::mock_interface::MockError;
use qmc5883l::{Config, Error, MeasurementMode};

#[test]
fn test_read_failure_is_propagated() {
    let (mut driver, mock) = create_mock_driver();
    mock.fail_next_read();

    let result = driver.read_raw_axes();

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
}

#[test]
fn test_read_failure_is_not_retried() {
    let (mut driver, mock) = create_mock_driver();
    mock.fail_all(true);

    assert!(driver.calibrated_bearing().is_err());
    assert!(driver.raw_bearing().is_err());
    assert!(driver.calibrated_vector().is_err());
    assert!(driver.read_temperature().is_err());
    assert!(driver.read_status().is_err());

    // One bus call per request
    assert_eq!(mock.attempts(), 5);
    assert!(mock.operations().is_empty());
}

#[test]
fn test_driver_recovers_after_transient_failure() {
    let (mut driver, mock) = create_mock_driver();
    mock.set_mag_data(1, 2, 3);
    mock.fail_next_read();

    assert!(driver.read_raw_axes().is_err());

    let data = driver.read_raw_axes().unwrap();
    assert_eq!((data.x, data.y, data.z), (1, 2, 3));
}

#[test]
fn test_write_failure_during_mode_change_keeps_previous_mode() {
    let (mut driver, mock) = create_mock_driver();
    mock.fail_next_write();

    let result = driver.enter_standby_mode();

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    assert_eq!(driver.mode(), MeasurementMode::Continuous);
    assert!(mock.control_writes().is_empty());
}

#[test]
fn test_failed_restore_write_still_reports_new_mode() {
    let (mut driver, mock) = create_mock_driver();
    mock.fail_write_after(1);

    let result = driver.enter_standby_mode();

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    // Only the first write landed, and it already carried the standby mode bits
    assert_eq!(mock.control_writes(), vec![vec![0xC0, 0x01]]);
    assert_eq!(mock.get_register(0x09) & 0x03, 0);
    assert_eq!(driver.mode(), MeasurementMode::Standby);
    assert_eq!(driver.read_control().unwrap().mode, driver.mode());
}

#[test]
fn test_failed_restore_write_into_continuous_reports_continuous() {
    let config = Config {
        continuous_mode: false,
        ..Config::default()
    };
    let (mut driver, mock) = create_mock_driver_with_config(config);
    mock.fail_write_after(1);

    assert!(driver.enter_continuous_mode().is_err());

    assert_eq!(driver.mode(), MeasurementMode::Continuous);
    assert_eq!(driver.read_control().unwrap().mode, MeasurementMode::Continuous);
}

#[test]
fn test_failed_bearing_leaves_settings_untouched() {
    let (mut driver, mock) = create_mock_driver();
    driver.set_declination(5.0).unwrap();
    mock.fail_next_read();

    assert!(driver.calibrated_bearing().is_err());
    assert_eq!(driver.declination(), 5.0);
}
