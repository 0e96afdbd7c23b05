//! # A driver for the Bosch BMP280 pressure and temperature sensor
//!
//! The [BMP280](https://www.bosch-sensortec.com/products/environmental-sensors/pressure-sensors/bmp280/)
//! is a barometric pressure sensor with an on-chip temperature sensor. This
//! crate talks to it over Linux I2C and supports two ways of reading it:
//!
//! * Direct reads of a single [`Channel`], returning an integer or a
//!   fixed-point fraction.
//! * Triggered capture, where every enabled channel is packed into one
//!   binary sample per trigger and handed to a [`SampleSink`].
//!
//! Compensated temperature is reported in 1/100 degrees Celsius and
//! compensated pressure in 1/256 Pascal, both computed with the datasheet's
//! integer formulas.

extern crate byteorder;
extern crate i2cdev;
extern crate log;
extern crate measurements;

mod bmp280;
pub mod buffer;
pub mod bus;
pub mod calibration;
pub mod channel;
pub mod compensation;
pub mod registers;
pub mod trigger;

#[cfg(test)]
mod testing;

use std::fmt;

use log::error;

pub use measurements::Pressure;
pub use measurements::Temperature;

pub use bmp280::{initialize, Bmp280};
pub use buffer::{AssembledBuffer, SampleSink};
pub use bus::{Bus, I2cBus};
pub use calibration::Calibration;
pub use channel::{Channel, ChannelValue, ScanMask};
pub use trigger::{TriggerHandle, TriggerWorker};

/// I2C bus the sensor usually sits on.
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

/// I2C address with SDO tied to ground. Tie SDO high for 0x77.
pub const DEFAULT_I2C_ADDRESS: u16 = 0x76;

/// Errors that this crate can return
#[derive(Debug)]
pub enum Bmp280Error<E> {
    /// The bus transport failed.
    Bus(E),
    /// A block read returned fewer bytes than asked for.
    ShortRead {
        register: u8,
        expected: usize,
        actual: usize,
    },
    /// The identity register didn't hold the BMP280 chip id.
    UnexpectedDevice { found: u8 },
    /// The channel isn't in the channel table.
    InvalidChannel(Channel),
    /// The sample sink refused a sample.
    SampleRejected,
}

/// A shortcut for Results that can return `T` or `Bmp280Error`
pub type Bmp280Result<T, E> = Result<T, Bmp280Error<E>>;

impl<E> Bmp280Error<E> {
    /// True for transport failures and short reads.
    pub fn is_io(&self) -> bool {
        match self {
            Bmp280Error::Bus(_) | Bmp280Error::ShortRead { .. } => true,
            _ => false,
        }
    }
}

impl<E> From<E> for Bmp280Error<E> {
    fn from(err: E) -> Bmp280Error<E> {
        Bmp280Error::Bus(err)
    }
}

impl<E: fmt::Display> fmt::Display for Bmp280Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bmp280Error::Bus(err) => write!(f, "bus error: {}", err),
            Bmp280Error::ShortRead {
                register,
                expected,
                actual,
            } => write!(
                f,
                "expected {} bytes from register 0x{:02x}, read {}",
                expected, register, actual
            ),
            Bmp280Error::UnexpectedDevice { found } => write!(
                f,
                "unexpected chip id 0x{:02x}, expecting 0x{:02x}",
                found,
                registers::BMP280_ID
            ),
            Bmp280Error::InvalidChannel(channel) => write!(f, "invalid channel {:?}", channel),
            Bmp280Error::SampleRejected => write!(f, "sample rejected by sink"),
        }
    }
}

impl<E> std::error::Error for Bmp280Error<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Bmp280Error::Bus(err) => Some(err),
            _ => None,
        }
    }
}

/// Fill `buf` from consecutive registers, failing on a short transfer.
pub(crate) fn read_exact<B: Bus>(
    bus: &mut B,
    register: u8,
    buf: &mut [u8],
) -> Bmp280Result<(), B::Error> {
    let actual = bus.read_block(register, buf)?;
    if actual != buf.len() {
        error!(
            "Expected {} bytes from register 0x{:02x}. Read {} instead",
            buf.len(),
            register,
            actual
        );
        return Err(Bmp280Error::ShortRead {
            register,
            expected: buf.len(),
            actual,
        });
    }
    Ok(())
}


// End of file
