//! Register definitions for the QMC5883L
//!
//! The QMC5883L exposes a flat 8-bit register file. Output data is stored
//! little-endian (LSB at the lower address) and the axis, status and temperature
//! registers are contiguous, so a single block read starting at `OUT_X_LSB` returns
//! X, Y and Z in order.
//!
//! | Register        | Offset      | Contents                                   |
//! |-----------------|-------------|--------------------------------------------|
//! | `OUT_X_LSB/MSB` | 0x00 / 0x01 | raw X, little-endian signed 16-bit         |
//! | `OUT_Y_LSB/MSB` | 0x02 / 0x03 | raw Y                                      |
//! | `OUT_Z_LSB/MSB` | 0x04 / 0x05 | raw Z                                      |
//! | `STATUS`        | 0x06        | data ready / overflow / data skipped       |
//! | `TEMP_LSB/MSB`  | 0x07 / 0x08 | die temperature, signed 16-bit             |
//! | `CONF_1`        | 0x09        | mode / rate / range / oversampling         |
//! | `CONF_2`        | 0x0A        | interrupt / pointer roll-over / soft reset |
//! | `RST_PERIOD`    | 0x0B        | set/reset period                           |
//! | `CHIP_ID`       | 0x0D        | identity, reads 0xFF                       |

/// First axis data register (X LSB); the start of the 6-byte axis block
pub const OUT_X_LSB: u8 = 0x00;

/// Y axis LSB
pub const OUT_Y_LSB: u8 = 0x02;

/// Z axis LSB
pub const OUT_Z_LSB: u8 = 0x04;

/// Status register
pub const STATUS: u8 = 0x06;

/// Temperature LSB; the start of the 2-byte temperature block
pub const TEMP_LSB: u8 = 0x07;

/// Control register 1. Control register 2 follows at `CONF_1 + 1`
pub const CONF_1: u8 = 0x09;

/// Control register 2
pub const CONF_2: u8 = 0x0A;

/// Set/reset period register (left at its power-on value by this driver)
pub const RST_PERIOD: u8 = 0x0B;

/// Chip identification register
pub const CHIP_ID: u8 = 0x0D;

device_driver::create_device!(
    device_name: Qmc5883l,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = LE;
        }

        /// STATUS - Data status (0x06)
        register Status {
            const ADDRESS = 0x06;
            const SIZE_BITS = 8;

            /// New data is ready (cleared by reading the data registers)
            drdy: bool = 0,
            /// At least one axis exceeded the selected range
            ovl: bool = 1,
            /// A measurement was skipped because data was not read in time
            dor: bool = 2,
            reserved_7_3: uint = 3..8,
        },

        /// CONF_1 - Control register 1 (0x09)
        register Control1 {
            const ADDRESS = 0x09;
            const SIZE_BITS = 8;

            /// Operating mode (0 = standby, 1 = continuous)
            mode: uint = 0..2,
            /// Output data rate code
            odr: uint = 2..4,
            /// Full-scale range code (0 = 2G, 1 = 8G)
            rng: uint = 4..6,
            /// Over-sampling ratio code
            osr: uint = 6..8,
        },

        /// CONF_2 - Control register 2 (0x0A)
        register Control2 {
            const ADDRESS = 0x0A;
            const SIZE_BITS = 8;

            /// Interrupt pin enable
            int_enb: bool = 0,
            reserved_5_1: uint = 1..6,
            /// Pointer roll-over across the data registers
            rol_pnt: bool = 6,
            /// Soft reset; restores default register values
            soft_rst: bool = 7,
        },

        /// CHIP_ID - Chip identification (0x0D)
        /// Expected value: 0xFF
        register ChipId {
            const ADDRESS = 0x0D;
            const SIZE_BITS = 8;

            /// Identity byte
            chip_id: uint = 0..8,
        }
    }
);

// Re-export commonly used types for convenience
pub use Qmc5883l as RegisterDevice;
