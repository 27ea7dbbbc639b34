#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod device;
pub mod interface;
pub mod power;
pub mod registers;
pub mod sensors;

// Re-export main types
pub use config::{Config, OutputRate, Oversampling, ResolvedConfig};
pub use device::{ControlStatus, Qmc5883lDriver, Status};
pub use interface::I2cInterface;
pub use power::{ControlRegisters, ControlSequence, MeasurementMode};
pub use sensors::{CalibratedMag, CalibrationMatrix, Compass, MagData};

/// QMC5883L default I2C address (0x0D)
pub const DEFAULT_I2C_ADDRESS: u8 = 0x0D;

/// Expected value of the `CHIP_ID` register
///
/// Some compatible parts report a different value; a mismatch is only logged.
pub const CHIP_ID_VALUE: u8 = 0xFF;

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Unsupported output rate or over-sampling ratio
    InvalidConfig,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

/// Rejected declination or calibration input
///
/// These are not failures: the driver keeps its previous value and stays usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationWarning {
    /// Declination outside `[-180, 180]` degrees
    DeclinationOutOfRange,
    /// Declination is NaN or infinite
    DeclinationNotFinite,
    /// Calibration is not exactly 3x3
    CalibrationShape,
    /// Calibration holds a NaN or infinite coefficient
    CalibrationNotFinite,
}
