//! High-level driver API for the QMC5883L
//!
//! This module provides the device controller (configuration and mode
//! transitions) and the acquisition entry points (raw axes, temperature,
//! calibrated vector and bearings). Calibration math lives in
//! [`sensors::magnetometer`](crate::sensors::magnetometer); the driver only feeds
//! it samples.
//!
//! All calls are blocking. A bus failure is returned to the caller as
//! [`Error::Bus`] without retrying. The driver puts the sensor into standby when
//! it is dropped, including when construction fails after the bus was touched.

use crate::config::{Config, ResolvedConfig};
use crate::power::{ControlSequence, MeasurementMode};
use crate::registers::{RegisterDevice, CONF_1, OUT_X_LSB, TEMP_LSB};
use crate::sensors::magnetometer::{decode_i16, CalibratedMag, CalibrationMatrix, Compass, MagData};
use crate::{Error, ValidationWarning, CHIP_ID_VALUE};

use device_driver::RegisterInterface;

/// Data status flags (`STATUS` register)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// New data is ready
    pub data_ready: bool,
    /// At least one axis exceeded the selected range
    pub overflow: bool,
    /// A measurement was skipped because data was not read in time
    pub data_skipped: bool,
}

/// Control register contents as read back from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlStatus {
    /// Operating mode
    pub mode: MeasurementMode,
    /// Output data rate code
    pub rate_code: u8,
    /// 8 gauss range selected
    pub full_scale: bool,
    /// Over-sampling ratio code
    pub oversampling_code: u8,
    /// Interrupt pin enabled
    pub interrupt_enabled: bool,
    /// Pointer roll-over enabled
    pub pointer_roll_enabled: bool,
    /// Soft-reset bit
    pub restore: bool,
}

/// Main driver for the QMC5883L
///
/// Pass `&mut` to the bus when building the interface to keep using the bus
/// after the driver is dropped.
pub struct Qmc5883lDriver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    device: RegisterDevice<I>,
    config: ResolvedConfig,
    mode: MeasurementMode,
    chip_id: u8,
    compass: Compass,
}

impl<I> Qmc5883lDriver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new QMC5883L driver instance
    ///
    /// Validates the configuration, reads `CHIP_ID` and writes the control
    /// registers for the configured mode. A chip identity other than 0xFF is
    /// only logged, since compatible parts may report a different value.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output rate or over-sampling ratio is not supported
    ///   ([`Error::InvalidConfig`], the bus is not touched)
    /// - Communication with the device fails
    pub fn new(interface: I, config: Config) -> Result<Self, Error<I::Error>> {
        let resolved = config.resolve().ok_or(Error::InvalidConfig)?;

        let mut driver = Self {
            device: RegisterDevice::new(interface),
            config: resolved,
            mode: MeasurementMode::Standby,
            chip_id: 0,
            compass: Compass::new(),
        };

        driver.chip_id = driver.read_chip_id()?;
        if !driver.is_genuine_chip() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "QMC5883L: chip id is {=u8:#x} instead of {=u8:#x}; is this the right chip?",
                driver.chip_id,
                CHIP_ID_VALUE
            );
        }

        if config.continuous_mode {
            driver.enter_continuous_mode()?;
        } else {
            driver.enter_standby_mode()?;
        }

        Ok(driver)
    }

    /// Validated configuration in use
    pub const fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Mode most recently written to the device
    pub const fn mode(&self) -> MeasurementMode {
        self.mode
    }

    /// `CHIP_ID` value read at construction
    pub const fn chip_id(&self) -> u8 {
        self.chip_id
    }

    /// Check whether `CHIP_ID` matched the expected 0xFF
    pub const fn is_genuine_chip(&self) -> bool {
        self.chip_id == CHIP_ID_VALUE
    }

    /// Read the `CHIP_ID` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_chip_id(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.chip_id().read()?;
        Ok(reg.chip_id())
    }

    /// Start continuous measurement at the configured rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn enter_continuous_mode(&mut self) -> Result<(), Error<I::Error>> {
        self.write_control(MeasurementMode::Continuous)
    }

    /// Stop measuring
    ///
    /// The over-sampling field is set to its lowest-power value while in standby.
    /// This also runs automatically when the driver is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn enter_standby_mode(&mut self) -> Result<(), Error<I::Error>> {
        self.write_control(MeasurementMode::Standby)
    }

    /// Write both control registers for `mode`, twice, so the restore bit sees a
    /// rising edge
    ///
    /// The first write already carries the new mode bits, so `mode()` follows it
    /// even if the second write fails.
    fn write_control(&mut self, mode: MeasurementMode) -> Result<(), Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("QMC5883L: entering {} mode", mode);

        let sequence = ControlSequence::new(&self.config, mode);

        // CONF_1 and CONF_2 are adjacent, one block write latches both
        self.device
            .interface
            .write_register(CONF_1, 16, &sequence.prime.to_bytes())?;
        self.mode = mode;

        self.device
            .interface
            .write_register(CONF_1, 16, &sequence.commit.to_bytes())?;
        Ok(())
    }

    /// Read back the control registers
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_control(&mut self) -> Result<ControlStatus, Error<I::Error>> {
        let conf_1 = self.device.control_1().read()?;
        let conf_2 = self.device.control_2().read()?;

        Ok(ControlStatus {
            mode: MeasurementMode::from_bits(conf_1.mode()),
            rate_code: conf_1.odr(),
            full_scale: conf_1.rng() != 0,
            oversampling_code: conf_1.osr(),
            interrupt_enabled: conf_2.int_enb(),
            pointer_roll_enabled: conf_2.rol_pnt(),
            restore: conf_2.soft_rst(),
        })
    }

    /// Read the `STATUS` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_status(&mut self) -> Result<Status, Error<I::Error>> {
        let reg = self.device.status().read()?;
        Ok(Status {
            data_ready: reg.drdy(),
            overflow: reg.ovl(),
            data_skipped: reg.dor(),
        })
    }

    /// Read raw magnetometer data
    ///
    /// One 6-byte block read from `OUT_X_LSB`, so the three axes come from the
    /// same conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_raw_axes(&mut self) -> Result<MagData, Error<I::Error>> {
        let mut buffer = [0u8; 6];
        self.device
            .interface
            .read_register(OUT_X_LSB, 48, &mut buffer)?;

        Ok(MagData::from_le_bytes(buffer))
    }

    /// Read the raw die temperature
    ///
    /// The sensor's temperature output is relative and uncalibrated, so no
    /// conversion is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature(&mut self) -> Result<i16, Error<I::Error>> {
        let mut buffer = [0u8; 2];
        self.device
            .interface
            .read_register(TEMP_LSB, 16, &mut buffer)?;

        Ok(decode_i16(buffer[0], buffer[1]))
    }

    /// Read a sample and apply the horizontal calibration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn calibrated_vector(&mut self) -> Result<CalibratedMag, Error<I::Error>> {
        let raw = self.read_raw_axes()?;
        Ok(self.compass.calibration().calibrate(&raw))
    }

    /// Read a sample and return its uncalibrated bearing in `[0, 360)`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn raw_bearing(&mut self) -> Result<f32, Error<I::Error>> {
        let raw = self.read_raw_axes()?;
        Ok(raw.bearing())
    }

    /// Read a sample and return its calibrated, declination-corrected bearing in
    /// `[0, 360)`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn calibrated_bearing(&mut self) -> Result<f32, Error<I::Error>> {
        let raw = self.read_raw_axes()?;
        Ok(self.compass.bearing(&raw))
    }

    /// Magnetic declination in degrees
    pub const fn declination(&self) -> f32 {
        self.compass.declination()
    }

    /// Set the magnetic declination in degrees, within `[-180, 180]`
    ///
    /// # Errors
    ///
    /// Returns a warning and keeps the previous value if the input is rejected.
    pub fn set_declination(&mut self, degrees: f32) -> Result<(), ValidationWarning> {
        self.compass.set_declination(degrees)
    }

    /// Current calibration matrix
    pub const fn calibration(&self) -> CalibrationMatrix {
        self.compass.calibration()
    }

    /// Replace the calibration matrix
    ///
    /// # Errors
    ///
    /// Returns a warning and keeps the previous matrix if a coefficient is not
    /// finite.
    pub fn set_calibration(&mut self, matrix: CalibrationMatrix) -> Result<(), ValidationWarning> {
        self.compass.set_calibration(matrix)
    }

    /// Replace the calibration matrix from rows of any numeric type
    ///
    /// # Example
    ///
    /// ```ignore
    /// compass.set_calibration_rows(&[
    ///     [1.3471, 0.1271, 7934.69],
    ///     [0.1271, 1.0466, 2401.43],
    ///     [0.0, 0.0, 1.0],
    /// ])?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a warning and keeps the previous matrix if the rows are not 3x3 or
    /// hold a non-finite value.
    pub fn set_calibration_rows<R, T>(&mut self, rows: &[R]) -> Result<(), ValidationWarning>
    where
        R: AsRef<[T]>,
        T: Copy + Into<f64>,
    {
        self.compass.set_calibration_rows(rows)
    }

    /// Calibration and declination state
    pub const fn compass(&self) -> &Compass {
        &self.compass
    }
}

impl<I> Drop for Qmc5883lDriver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    fn drop(&mut self) {
        if self.enter_standby_mode().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("QMC5883L: failed to enter standby on drop");
        }
    }
}
