//! * Driver for the BMP280 pressure and temperature sensor
//! See https://www.bosch-sensortec.com/products/environmental-sensors/pressure-sensors/bmp280/

use std::time::SystemTime;

use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use log::{debug, error, trace};
use measurements::{Pressure, Temperature};

use crate::buffer::{self, AssembledBuffer, SampleSink};
use crate::bus::{Bus, I2cBus};
use crate::calibration::Calibration;
use crate::channel::{Channel, ChannelSpec, ChannelValue, ScanMask};
use crate::compensation::{self, adc_from_raw, raw_from_triple};
use crate::registers::{
    BMP280_ID, CONFIG, CTRL_MEAS, RAW_SAMPLE_LEN, REG_CONFIG, REG_CTRL_MEAS, REG_ID,
    REG_PRESS_MSB, REG_TEMP_MSB,
};
use crate::{read_exact, Bmp280Error, Bmp280Result, DEFAULT_I2C_ADDRESS, DEFAULT_I2C_BUS};

/// Divisor of the compensated temperature (1/100 degC).
pub const TEMPERATURE_DIVISOR: i64 = 100;

/// Divisor of the compensated pressure (1/256 Pa).
pub const PRESSURE_DIVISOR: i64 = 256;

/// Check the chip id and apply our fixed sampling configuration.
///
/// Both channels use x16 oversampling (20 bit resolution), the chip runs in
/// normal mode with a 1000ms standby time, the IIR filter is off and 3-wire
/// SPI is disabled.
pub fn initialize<B: Bus>(bus: &mut B) -> Bmp280Result<(), B::Error> {
    let id = bus.read_byte(REG_ID)?;
    if id != BMP280_ID {
        error!("Unexpected sensor id 0x{:02x}. Expecting 0x{:02x}", id, BMP280_ID);
        return Err(Bmp280Error::UnexpectedDevice { found: id });
    }
    bus.write_byte(REG_CONFIG, CONFIG)?;
    bus.write_byte(REG_CTRL_MEAS, CTRL_MEAS)?;
    debug!("config 0x{:02x}, ctrl_meas 0x{:02x}", CONFIG, CTRL_MEAS);
    Ok(())
}

/// An initialised BMP280.
pub struct Bmp280<B> {
    bus: B,
    calibration: Calibration,
}

impl Bmp280<I2cBus<LinuxI2CDevice>> {
    /// Open the sensor at `address` on the I2C bus at `path`.
    pub fn open(path: &str, address: u16) -> Bmp280Result<Self, LinuxI2CError> {
        debug!("opening BMP280 at 0x{:02x} on {}", address, path);
        let i2cdev = LinuxI2CDevice::new(path, address)?;
        Bmp280::new(I2cBus::new(i2cdev))
    }

    /// Open the sensor at the default address on the default bus.
    pub fn open_default() -> Bmp280Result<Self, LinuxI2CError> {
        Bmp280::open(DEFAULT_I2C_BUS, DEFAULT_I2C_ADDRESS)
    }
}

impl<B> Bmp280<B>
where
    B: Bus,
{
    /// Identify and configure the chip, then read its calibration.
    ///
    /// Any failure drops the bus.
    pub fn new(mut bus: B) -> Bmp280Result<Bmp280<B>, B::Error> {
        initialize(&mut bus)?;
        let calibration = Calibration::load(&mut bus)?;
        Ok(Bmp280 { bus, calibration })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Give back the bus.
    pub fn release(self) -> B {
        self.bus
    }

    fn read_triple(&mut self, register: u8) -> Bmp280Result<i32, B::Error> {
        let mut buf = [0u8; RAW_SAMPLE_LEN];
        read_exact(&mut self.bus, register, &mut buf)?;
        Ok(raw_from_triple(&buf))
    }

    /// Raw temperature register contents, padding bits included.
    pub fn read_raw_temperature(&mut self) -> Bmp280Result<i32, B::Error> {
        self.read_triple(REG_TEMP_MSB)
    }

    /// Raw pressure register contents, padding bits included.
    pub fn read_raw_pressure(&mut self) -> Bmp280Result<i32, B::Error> {
        self.read_triple(REG_PRESS_MSB)
    }

    /// Temperature in 1/100 degC.
    pub fn read_processed_temperature(&mut self) -> Bmp280Result<i32, B::Error> {
        let raw = self.read_raw_temperature()?;
        Ok(compensation::temperature(adc_from_raw(raw), &self.calibration))
    }

    /// Pressure in 1/256 Pa.
    pub fn read_processed_pressure(&mut self) -> Bmp280Result<u32, B::Error> {
        // Pressure and temperature in one burst so both come from the same
        // measurement.
        let mut buf = [0u8; 2 * RAW_SAMPLE_LEN];
        read_exact(&mut self.bus, REG_PRESS_MSB, &mut buf)?;
        let raw_p = raw_from_triple(&buf[..RAW_SAMPLE_LEN]);
        let raw_t = raw_from_triple(&buf[RAW_SAMPLE_LEN..]);
        Ok(compensation::pressure(
            adc_from_raw(raw_p),
            adc_from_raw(raw_t),
            &self.calibration,
        ))
    }

    /// Read the current value of a channel.
    ///
    /// Calibration channels never touch the bus. Raw channels and
    /// compensated channels do one block read each.
    pub fn read_channel(&mut self, channel: Channel) -> Bmp280Result<ChannelValue, B::Error> {
        let spec = channel.spec().ok_or(Bmp280Error::InvalidChannel(channel))?;
        self.resolve(spec)
    }

    /// Returns a Temperature reading.
    pub fn read_temperature(&mut self) -> Bmp280Result<Temperature, B::Error> {
        let centi = self.read_processed_temperature()?;
        Ok(Temperature::from_celsius(
            f64::from(centi) / TEMPERATURE_DIVISOR as f64,
        ))
    }

    /// Returns a Pressure reading.
    pub fn read_pressure(&mut self) -> Bmp280Result<Pressure, B::Error> {
        let fixed = self.read_processed_pressure()?;
        Ok(Pressure::from_pascals(
            f64::from(fixed) / PRESSURE_DIVISOR as f64,
        ))
    }

    fn resolve(&mut self, spec: &ChannelSpec) -> Bmp280Result<ChannelValue, B::Error> {
        let channel = spec.channel;
        match channel {
            Channel::TemperatureCalibration(i) => self
                .calibration
                .temperature(usize::from(i) + 1)
                .map(|v| ChannelValue::Int(i64::from(v)))
                .ok_or(Bmp280Error::InvalidChannel(channel)),
            Channel::PressureCalibration(i) => self
                .calibration
                .pressure(usize::from(i) + 1)
                .map(|v| ChannelValue::Int(i64::from(v)))
                .ok_or(Bmp280Error::InvalidChannel(channel)),
            Channel::TemperatureRaw | Channel::PressureRaw => {
                let register = spec.address.ok_or(Bmp280Error::InvalidChannel(channel))?;
                let raw = self.read_triple(register)?;
                Ok(ChannelValue::Int(i64::from(raw)))
            }
            Channel::TemperatureProcessed => Ok(ChannelValue::Fractional {
                value: i64::from(self.read_processed_temperature()?),
                divisor: TEMPERATURE_DIVISOR,
            }),
            Channel::PressureProcessed => Ok(ChannelValue::Fractional {
                value: i64::from(self.read_processed_pressure()?),
                divisor: PRESSURE_DIVISOR,
            }),
        }
    }

    /// Pack the current value of every channel in `mask` into one sample.
    pub fn assemble(&mut self, mask: ScanMask) -> Bmp280Result<AssembledBuffer, B::Error> {
        buffer::assemble(mask, |spec| self.resolve(spec))
    }

    /// Handle one trigger: capture the sink's active channels and push the
    /// sample.
    ///
    /// `notify_done` is always called on the sink, even when assembly or
    /// the push fails.
    pub fn handle_trigger<S: SampleSink>(
        &mut self,
        sink: &mut S,
        timestamp: SystemTime,
    ) -> Bmp280Result<(), B::Error> {
        let mask = sink.active_scan_mask();
        trace!("trigger, scan mask {:?}", mask);
        let result = match self.assemble(mask) {
            Ok(sample) => sink.push(&sample, timestamp).map_err(|err| {
                error!("Failed to push sample: {}", err);
                Bmp280Error::SampleRejected
            }),
            Err(err) => {
                error!("Failed to assemble sample");
                Err(err)
            }
        };
        sink.notify_done();
        result
    }
}
