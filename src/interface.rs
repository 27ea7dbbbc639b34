//! Bus interface implementation for the QMC5883L
//!
//! This module provides the `device-driver` register interface over I2C, which is
//! the only bus the QMC5883L supports. A read is one `write_read` transaction that
//! sends the start register and reads back `read_data.len()` bytes; a write is one
//! `write` transaction of the start register followed by the data bytes, so
//! consecutive registers are latched together.

use crate::DEFAULT_I2C_ADDRESS;

use device_driver::RegisterInterface;

/// Largest block a single write can carry (the whole register file fits)
pub const MAX_WRITE_LEN: usize = 14;

/// I2C interface for the QMC5883L
///
/// Block writes are limited to [`MAX_WRITE_LEN`] data bytes. Longer writes are a
/// caller bug: debug builds panic, release builds send only the first
/// `MAX_WRITE_LEN` bytes.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the default address (0x0D)
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral, or `&mut` to one to keep ownership
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(&mut i2c);
    /// let mut compass = Qmc5883lDriver::new(interface, Config::default())?;
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// Some breakout boards and clones answer on a different address.
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `address` - The 7-bit I2C device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit device address used for every transaction
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        debug_assert!(
            write_data.len() <= MAX_WRITE_LEN,
            "QMC5883L block write exceeds MAX_WRITE_LEN"
        );
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        buffer[0] = address;
        let len = write_data.len().min(MAX_WRITE_LEN);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len])
    }
}
