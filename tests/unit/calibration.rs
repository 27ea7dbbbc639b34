//! Calibration and declination settings tests

use crate::common::create_mock_driver;
use crate::common::test_utils::assert_float_eq;
use qmc5883l::{CalibrationMatrix, ValidationWarning};

#[test]
fn test_defaults_are_identity_and_zero_declination() {
    let (driver, _mock) = create_mock_driver();

    assert_eq!(driver.calibration(), CalibrationMatrix::IDENTITY);
    assert_eq!(driver.declination(), 0.0);
}

#[test]
fn test_set_declination_accepts_bounds() {
    let (mut driver, _mock) = create_mock_driver();

    driver.set_declination(180.0).unwrap();
    assert_eq!(driver.declination(), 180.0);

    driver.set_declination(-180.0).unwrap();
    assert_eq!(driver.declination(), -180.0);

    driver.set_declination(-1.6).unwrap();
    assert_float_eq(driver.declination(), -1.6, 1e-6);
}

#[test]
fn test_set_declination_rejects_out_of_range_and_keeps_value() {
    let (mut driver, _mock) = create_mock_driver();
    driver.set_declination(12.5).unwrap();

    assert_eq!(
        driver.set_declination(180.5),
        Err(ValidationWarning::DeclinationOutOfRange)
    );
    assert_eq!(
        driver.set_declination(-400.0),
        Err(ValidationWarning::DeclinationOutOfRange)
    );
    assert_eq!(
        driver.set_declination(f32::NAN),
        Err(ValidationWarning::DeclinationNotFinite)
    );
    assert_eq!(
        driver.set_declination(f32::INFINITY),
        Err(ValidationWarning::DeclinationNotFinite)
    );

    assert_eq!(driver.declination(), 12.5);
}

#[test]
fn test_set_calibration_rows_from_integers() {
    let (mut driver, _mock) = create_mock_driver();

    driver
        .set_calibration_rows(&[[1i32, 2, 3], [4, 5, 6], [0, 0, 1]])
        .unwrap();

    assert_eq!(
        driver.calibration().coefficients(),
        [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [0.0, 0.0, 1.0]]
    );
}

#[test]
fn test_set_calibration_rows_from_slices() {
    let (mut driver, _mock) = create_mock_driver();
    let rows: [&[f64]; 3] = [
        &[1.3471, 0.1271, 7934.69],
        &[0.1271, 1.0466, 2401.43],
        &[0.0, 0.0, 1.0],
    ];

    driver.set_calibration_rows(&rows).unwrap();

    let c = driver.calibration().coefficients();
    assert_float_eq(c[0][2], 7934.69, 1e-2);
    assert_float_eq(c[1][1], 1.0466, 1e-5);
}

#[test]
fn test_malformed_calibration_is_rejected_and_previous_kept() {
    let (mut driver, _mock) = create_mock_driver();
    let matrix = CalibrationMatrix::new([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]]);
    driver.set_calibration(matrix).unwrap();

    let two_rows: [&[f32]; 2] = [&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]];
    assert_eq!(
        driver.set_calibration_rows(&two_rows),
        Err(ValidationWarning::CalibrationShape)
    );

    let short_row: [&[f32]; 3] = [&[1.0, 0.0], &[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0]];
    assert_eq!(
        driver.set_calibration_rows(&short_row),
        Err(ValidationWarning::CalibrationShape)
    );

    assert_eq!(
        driver.set_calibration_rows(&[[f64::NAN, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
        Err(ValidationWarning::CalibrationNotFinite)
    );

    assert_eq!(
        driver.set_calibration(CalibrationMatrix::new([
            [1.0, 0.0, f32::INFINITY],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0]
        ])),
        Err(ValidationWarning::CalibrationNotFinite)
    );

    assert_eq!(driver.calibration(), matrix);
}

#[test]
fn test_compass_state_matches_driver_accessors() {
    let (mut driver, _mock) = create_mock_driver();
    driver.set_declination(-45.0).unwrap();

    let compass = driver.compass();

    assert_eq!(compass.declination(), -45.0);
    assert_eq!(compass.calibration(), CalibrationMatrix::IDENTITY);
}
