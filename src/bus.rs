//! Register access used by the driver.
//!
//! The driver never talks to `i2cdev` directly; it goes through [`Bus`], so
//! anything that can read and write byte registers can host a BMP280.

use i2cdev::core::I2CDevice;

/// Synchronous register access to the sensor.
pub trait Bus {
    type Error;

    /// Read a single register.
    fn read_byte(&mut self, register: u8) -> Result<u8, Self::Error>;

    /// Write a single register.
    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Read consecutive registers starting at `register` into `buf`.
    ///
    /// Returns the number of bytes actually transferred, which may be less
    /// than `buf.len()`. The driver treats a short count as an I/O failure.
    fn read_block(&mut self, register: u8, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// A [`Bus`] over any `i2cdev` device, using SMBus transfers.
pub struct I2cBus<T> {
    i2cdev: T,
}

impl<T> I2cBus<T>
where
    T: I2CDevice + Sized,
{
    pub fn new(i2cdev: T) -> I2cBus<T> {
        I2cBus { i2cdev }
    }

    /// Give back the underlying device.
    pub fn into_inner(self) -> T {
        self.i2cdev
    }
}

impl<T> Bus for I2cBus<T>
where
    T: I2CDevice + Sized,
{
    type Error = T::Error;

    fn read_byte(&mut self, register: u8) -> Result<u8, T::Error> {
        self.i2cdev.smbus_read_byte_data(register)
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), T::Error> {
        self.i2cdev.smbus_write_byte_data(register, value)
    }

    fn read_block(&mut self, register: u8, buf: &mut [u8]) -> Result<usize, T::Error> {
        // SMBus block transfers top out at 32 bytes, far above anything we ask for.
        let len = buf.len().min(32) as u8;
        let data = self.i2cdev.smbus_read_i2c_block_data(register, len)?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }
}
