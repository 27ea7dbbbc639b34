//! Sensor data types for the QMC5883L
//!
//! The magnetometer module holds the raw sample type, the sign-extension decode,
//! the horizontal calibration and the bearing computation. None of it touches
//! the bus; the driver feeds it samples read through `Qmc5883lDriver`.

pub mod magnetometer;

// Re-export main types
pub use magnetometer::{CalibratedMag, CalibrationMatrix, Compass, MagData};
