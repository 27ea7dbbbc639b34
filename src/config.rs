//! Measurement configuration
//!
//! [`Config`] carries the user-facing settings in the units they are usually
//! quoted in (Hz and oversampling ratio). The driver resolves them against the
//! fixed lookup tables below once, at construction; anything not in the tables is
//! rejected with [`Error::InvalidConfig`](crate::Error::InvalidConfig) rather than
//! rounded to a nearby value.

/// Output data rate in continuous mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputRate {
    /// 10 Hz
    Hz10 = 0,
    /// 50 Hz
    Hz50 = 1,
    /// 100 Hz
    Hz100 = 2,
    /// 200 Hz
    Hz200 = 3,
}

/// Supported output rates, by frequency in Hz
static OUTPUT_RATES: [(u16, OutputRate); 4] = [
    (10, OutputRate::Hz10),
    (50, OutputRate::Hz50),
    (100, OutputRate::Hz100),
    (200, OutputRate::Hz200),
];

impl OutputRate {
    /// Look up the rate for a frequency in Hz
    ///
    /// Returns `None` for any frequency the sensor does not support.
    #[must_use]
    pub fn from_hz(hz: u16) -> Option<Self> {
        OUTPUT_RATES
            .iter()
            .find(|(value, _)| *value == hz)
            .map(|(_, rate)| *rate)
    }

    /// Frequency in Hz
    #[must_use]
    pub const fn hz(self) -> u16 {
        match self {
            Self::Hz10 => 10,
            Self::Hz50 => 50,
            Self::Hz100 => 100,
            Self::Hz200 => 200,
        }
    }

    /// 2-bit `ODR` field code
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Over-sampling ratio
///
/// A larger ratio lowers noise and raises power consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    /// 512 samples
    Osr512 = 0,
    /// 256 samples
    Osr256 = 1,
    /// 128 samples
    Osr128 = 2,
    /// 64 samples (lowest power)
    Osr64 = 3,
}

/// Supported over-sampling ratios
static OVERSAMPLING_RATIOS: [(u16, Oversampling); 4] = [
    (64, Oversampling::Osr64),
    (128, Oversampling::Osr128),
    (256, Oversampling::Osr256),
    (512, Oversampling::Osr512),
];

impl Oversampling {
    /// Setting with the lowest power consumption
    pub const LOWEST_POWER: Self = Self::Osr64;

    /// Look up the setting for an over-sampling ratio
    ///
    /// Returns `None` for any ratio the sensor does not support.
    #[must_use]
    pub fn from_ratio(ratio: u16) -> Option<Self> {
        OVERSAMPLING_RATIOS
            .iter()
            .find(|(value, _)| *value == ratio)
            .map(|(_, osr)| *osr)
    }

    /// Over-sampling ratio
    #[must_use]
    pub const fn ratio(self) -> u16 {
        match self {
            Self::Osr512 => 512,
            Self::Osr256 => 256,
            Self::Osr128 => 128,
            Self::Osr64 => 64,
        }
    }

    /// 2-bit `OSR` field code
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Output data rate in Hz (10, 50, 100 or 200)
    pub output_rate_hz: u16,
    /// Over-sampling ratio (64, 128, 256 or 512)
    pub oversampling_ratio: u16,
    /// Use the 8 gauss range instead of 2 gauss
    pub full_scale: bool,
    /// Start sampling continuously after construction (otherwise stay in standby)
    pub continuous_mode: bool,
    /// Enable the data-ready interrupt pin
    pub interrupt_enabled: bool,
    /// Roll the read pointer over the data registers
    pub pointer_roll_enabled: bool,
    /// Pulse the soft-reset bit when the control registers are written
    pub restore_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_rate_hz: 10,
            oversampling_ratio: 512,
            full_scale: false,
            continuous_mode: true,
            interrupt_enabled: true,
            pointer_roll_enabled: false,
            restore_enabled: true,
        }
    }
}

impl Config {
    /// Resolve the numeric settings against the lookup tables
    ///
    /// Returns `None` if the rate or the over-sampling ratio is unsupported.
    #[must_use]
    pub fn resolve(&self) -> Option<ResolvedConfig> {
        Some(ResolvedConfig {
            rate: OutputRate::from_hz(self.output_rate_hz)?,
            oversampling: Oversampling::from_ratio(self.oversampling_ratio)?,
            full_scale: self.full_scale,
            interrupt_enabled: self.interrupt_enabled,
            pointer_roll_enabled: self.pointer_roll_enabled,
            restore_enabled: self.restore_enabled,
        })
    }
}

/// Configuration after validation, ready to be packed into control registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolvedConfig {
    /// Output data rate
    pub rate: OutputRate,
    /// Over-sampling ratio
    pub oversampling: Oversampling,
    /// 8 gauss range
    pub full_scale: bool,
    /// Data-ready interrupt
    pub interrupt_enabled: bool,
    /// Pointer roll-over
    pub pointer_roll_enabled: bool,
    /// Soft-reset pulse on configuration writes
    pub restore_enabled: bool,
}
