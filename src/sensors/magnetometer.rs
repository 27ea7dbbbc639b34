//! Magnetometer sample types, calibration and bearing computation
//!
//! Raw counts are used directly: no conversion to gauss is applied anywhere. The
//! calibration is an affine map of the horizontal plane,
//!
//! ```text
//! x' = x * c[0][0] + y * c[0][1] + c[0][2]
//! y' = x * c[1][0] + y * c[1][1] + c[1][2]
//! ```
//!
//! and the vertical axis passes through unchanged. Bearings are
//! `atan2(y, x)` in degrees, measured from the sensor X axis towards Y and
//! wrapped into `[0, 360)`.

use crate::ValidationWarning;

/// Largest magnitude accepted for the declination, in degrees
pub const MAX_DECLINATION_DEG: f32 = 180.0;

/// Decode a little-endian register pair as a signed 16-bit value
///
/// `lsb | msb << 8` is taken as an unsigned 16-bit value `v`; the result is `v`
/// for `v < 32768` and `v - 65536` otherwise.
#[must_use]
pub const fn decode_i16(lsb: u8, msb: u8) -> i16 {
    let raw = (lsb as u16) | ((msb as u16) << 8);
    // Two's-complement reinterpretation
    raw as i16
}

/// Wrap an angle that is at most one turn out of range into `[0, 360)`
fn normalize_degrees(mut degrees: f32) -> f32 {
    if degrees < 0.0 {
        degrees += 360.0;
    }
    // Also catches a tiny negative angle that rounded up to exactly 360
    if degrees >= 360.0 {
        degrees -= 360.0;
    }
    degrees
}

/// Bearing of the horizontal vector `(x, y)` in `[0, 360)`
#[must_use]
pub fn bearing_degrees(x: f32, y: f32) -> f32 {
    normalize_degrees(libm::atan2f(y, x).to_degrees())
}

/// Shift a bearing in `[0, 360)` by a declination in `[-180, 180]`
///
/// The result is wrapped back into `[0, 360)`.
#[must_use]
pub fn apply_declination(bearing: f32, declination: f32) -> f32 {
    normalize_degrees(bearing + declination)
}

/// Raw magnetometer sample (counts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagData {
    /// X-axis magnetic field (raw)
    pub x: i16,
    /// Y-axis magnetic field (raw)
    pub y: i16,
    /// Z-axis magnetic field (raw)
    pub z: i16,
}

impl MagData {
    /// Create a sample from raw axis values
    #[must_use]
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Decode the 6-byte axis block (`XL XH YL YH ZL ZH`)
    #[must_use]
    pub const fn from_le_bytes(data: [u8; 6]) -> Self {
        Self {
            x: decode_i16(data[0], data[1]),
            y: decode_i16(data[2], data[3]),
            z: decode_i16(data[4], data[5]),
        }
    }

    /// Uncalibrated bearing in `[0, 360)`
    #[must_use]
    pub fn bearing(&self) -> f32 {
        bearing_degrees(f32::from(self.x), f32::from(self.y))
    }
}

/// Sample with the horizontal calibration applied
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibratedMag {
    /// Calibrated X
    pub x: f32,
    /// Calibrated Y
    pub y: f32,
    /// Raw Z (not calibrated)
    pub z: i16,
}

impl CalibratedMag {
    /// Bearing of the calibrated horizontal vector, without declination
    #[must_use]
    pub fn bearing(&self) -> f32 {
        bearing_degrees(self.x, self.y)
    }

    /// Length of the calibrated horizontal vector
    #[must_use]
    pub fn horizontal_magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y)
    }
}

/// 3x3 horizontal calibration matrix
///
/// Rows 0 and 1 hold the affine map for X and Y. Row 2 is not used by the
/// transform and only keeps the matrix square.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationMatrix {
    coefficients: [[f32; 3]; 3],
}

impl Default for CalibrationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CalibrationMatrix {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        coefficients: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Create a matrix from its coefficients, row major
    #[must_use]
    pub const fn new(coefficients: [[f32; 3]; 3]) -> Self {
        Self { coefficients }
    }

    /// Build a matrix from rows of any numeric type
    ///
    /// Every value is converted to `f32`.
    ///
    /// # Errors
    ///
    /// - [`ValidationWarning::CalibrationShape`] unless there are exactly 3 rows of 3
    /// - [`ValidationWarning::CalibrationNotFinite`] if a value is NaN, infinite, or
    ///   overflows `f32`
    pub fn from_rows<R, T>(rows: &[R]) -> Result<Self, ValidationWarning>
    where
        R: AsRef<[T]>,
        T: Copy + Into<f64>,
    {
        if rows.len() != 3 || rows.iter().any(|row| row.as_ref().len() != 3) {
            return Err(ValidationWarning::CalibrationShape);
        }

        let mut coefficients = [[0.0f32; 3]; 3];
        for (out, row) in coefficients.iter_mut().zip(rows) {
            for (value, &input) in out.iter_mut().zip(row.as_ref()) {
                let wide: f64 = input.into();
                *value = wide as f32;
            }
        }

        let matrix = Self { coefficients };
        if matrix.is_finite() {
            Ok(matrix)
        } else {
            Err(ValidationWarning::CalibrationNotFinite)
        }
    }

    /// Coefficients, row major
    #[must_use]
    pub const fn coefficients(&self) -> [[f32; 3]; 3] {
        self.coefficients
    }

    /// Check that no coefficient is NaN or infinite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coefficients
            .iter()
            .flatten()
            .all(|value| value.is_finite())
    }

    /// Transform a horizontal vector
    #[must_use]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let c = &self.coefficients;
        (
            x * c[0][0] + y * c[0][1] + c[0][2],
            x * c[1][0] + y * c[1][1] + c[1][2],
        )
    }

    /// Calibrate a raw sample; Z passes through
    #[must_use]
    pub fn calibrate(&self, sample: &MagData) -> CalibratedMag {
        let (x, y) = self.apply(f32::from(sample.x), f32::from(sample.y));
        CalibratedMag { x, y, z: sample.z }
    }
}

/// Compass session state: calibration and declination
///
/// The bearing operations take `Option<MagData>` so a sample that was not
/// acquired stays absent through calibration and bearing computation instead of
/// being computed as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compass {
    calibration: CalibrationMatrix,
    declination: f32,
}

impl Compass {
    /// Identity calibration, zero declination
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calibration: CalibrationMatrix::IDENTITY,
            declination: 0.0,
        }
    }

    /// Magnetic declination in degrees
    #[must_use]
    pub const fn declination(&self) -> f32 {
        self.declination
    }

    /// Set the magnetic declination in degrees
    ///
    /// The value is kept as is; it is never clamped.
    ///
    /// # Errors
    ///
    /// Returns a warning and keeps the previous value if `degrees` is not finite or
    /// lies outside `[-180, 180]`.
    pub fn set_declination(&mut self, degrees: f32) -> Result<(), ValidationWarning> {
        let warning = if !degrees.is_finite() {
            ValidationWarning::DeclinationNotFinite
        } else if !(-MAX_DECLINATION_DEG..=MAX_DECLINATION_DEG).contains(&degrees) {
            ValidationWarning::DeclinationOutOfRange
        } else {
            self.declination = degrees;
            return Ok(());
        };

        #[cfg(feature = "defmt")]
        defmt::warn!("Declination {} rejected: {}", degrees, warning);

        Err(warning)
    }

    /// Current calibration matrix
    #[must_use]
    pub const fn calibration(&self) -> CalibrationMatrix {
        self.calibration
    }

    /// Replace the calibration matrix
    ///
    /// # Errors
    ///
    /// Returns [`ValidationWarning::CalibrationNotFinite`] and keeps the previous
    /// matrix if any coefficient is NaN or infinite.
    pub fn set_calibration(&mut self, matrix: CalibrationMatrix) -> Result<(), ValidationWarning> {
        if !matrix.is_finite() {
            let warning = ValidationWarning::CalibrationNotFinite;
            #[cfg(feature = "defmt")]
            defmt::warn!("Calibration rejected: {}", warning);
            return Err(warning);
        }

        self.calibration = matrix;
        Ok(())
    }

    /// Replace the calibration matrix from dynamically shaped rows
    ///
    /// # Errors
    ///
    /// Returns a warning and keeps the previous matrix if the rows are not exactly
    /// 3x3 or contain a non-finite value.
    pub fn set_calibration_rows<R, T>(&mut self, rows: &[R]) -> Result<(), ValidationWarning>
    where
        R: AsRef<[T]>,
        T: Copy + Into<f64>,
    {
        match CalibrationMatrix::from_rows(rows) {
            Ok(matrix) => self.set_calibration(matrix),
            Err(warning) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Calibration rejected: {}", warning);
                Err(warning)
            }
        }
    }

    /// Calibrated bearing of a sample, corrected by the declination
    #[must_use]
    pub fn bearing(&self, sample: &MagData) -> f32 {
        apply_declination(
            self.calibration.calibrate(sample).bearing(),
            self.declination,
        )
    }

    /// Apply the calibration to a sample
    #[must_use]
    pub fn calibrate(&self, sample: Option<MagData>) -> Option<CalibratedMag> {
        sample.map(|sample| self.calibration.calibrate(&sample))
    }

    /// Bearing of the raw horizontal vector, without calibration or declination
    #[must_use]
    pub fn raw_bearing(&self, sample: Option<MagData>) -> Option<f32> {
        sample.map(|sample| sample.bearing())
    }

    /// Bearing of the calibrated horizontal vector, corrected by the declination
    #[must_use]
    pub fn calibrated_bearing(&self, sample: Option<MagData>) -> Option<f32> {
        sample.map(|sample| self.bearing(&sample))
    }
}
