//! Measurement modes and control register packing
//!
//! The QMC5883L has two operating modes:
//! - **Standby**: no conversions, lowest power (the power-on state)
//! - **Continuous**: the sensor converts at the configured output rate
//!
//! Both control registers are derived from the configuration by a pure function,
//! [`ControlRegisters::pack`], and always written together as one block
//! (`CONF_1` then `CONF_2`).
//!
//! # Restore bit
//!
//! The soft-reset ("restore") bit in `CONF_2` only acts on a rising edge, so every
//! mode transition is a two-phase write: first with the bit cleared, then with the
//! configured value. See [`ControlSequence`].

use crate::config::{Oversampling, ResolvedConfig};

/// Operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
    /// No conversions
    Standby = 0,
    /// Periodic conversions at the configured output rate
    Continuous = 1,
}

impl MeasurementMode {
    /// Decode the two `CONF_1` mode bits; anything but continuous reads as standby
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        if bits & 0b11 == Self::Continuous as u8 {
            Self::Continuous
        } else {
            Self::Standby
        }
    }

    /// Check if the sensor is producing samples in this mode
    #[must_use]
    pub const fn is_sampling(self) -> bool {
        matches!(self, Self::Continuous)
    }
}

/// `CONF_1` bit positions
const MODE_SHIFT: u8 = 0;
const ODR_SHIFT: u8 = 2;
const RNG_SHIFT: u8 = 4;
const OSR_SHIFT: u8 = 6;

/// `CONF_2` bit positions
const INT_ENB_SHIFT: u8 = 0;
const ROL_PNT_SHIFT: u8 = 6;
const SOFT_RST_SHIFT: u8 = 7;

/// Contents of `CONF_1` and `CONF_2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlRegisters {
    /// `CONF_1`: mode, output rate, range, over-sampling
    pub conf_1: u8,
    /// `CONF_2`: interrupt, pointer roll-over, soft reset
    pub conf_2: u8,
}

impl ControlRegisters {
    /// Pack a configuration into register values for the given mode
    ///
    /// In standby the over-sampling field is forced to
    /// [`Oversampling::LOWEST_POWER`]. `restore` is the value of the soft-reset bit.
    #[must_use]
    pub const fn pack(config: &ResolvedConfig, mode: MeasurementMode, restore: bool) -> Self {
        let oversampling = match mode {
            MeasurementMode::Continuous => config.oversampling,
            MeasurementMode::Standby => Oversampling::LOWEST_POWER,
        };

        Self {
            conf_1: ((mode as u8) << MODE_SHIFT)
                | (config.rate.code() << ODR_SHIFT)
                | ((config.full_scale as u8) << RNG_SHIFT)
                | (oversampling.code() << OSR_SHIFT),
            conf_2: ((config.interrupt_enabled as u8) << INT_ENB_SHIFT)
                | ((config.pointer_roll_enabled as u8) << ROL_PNT_SHIFT)
                | ((restore as u8) << SOFT_RST_SHIFT),
        }
    }

    /// Register bytes in address order, for a block write starting at `CONF_1`
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 2] {
        [self.conf_1, self.conf_2]
    }

    /// Mode encoded in `CONF_1`
    #[must_use]
    pub const fn mode(self) -> MeasurementMode {
        MeasurementMode::from_bits(self.conf_1 >> MODE_SHIFT)
    }
}

/// Two-phase control register write for one mode transition
///
/// `prime` has the restore bit cleared and `commit` carries the configured restore
/// bit, so a configured restore always sees a rising edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSequence {
    /// First write (restore bit low)
    pub prime: ControlRegisters,
    /// Second write (configured restore bit)
    pub commit: ControlRegisters,
}

impl ControlSequence {
    /// Build the write sequence that moves the sensor into `mode`
    #[must_use]
    pub const fn new(config: &ResolvedConfig, mode: MeasurementMode) -> Self {
        Self {
            prime: ControlRegisters::pack(config, mode, false),
            commit: ControlRegisters::pack(config, mode, config.restore_enabled),
        }
    }

    /// Both writes, in the order they go on the bus
    #[must_use]
    pub const fn writes(self) -> [ControlRegisters; 2] {
        [self.prime, self.commit]
    }
}
