//! # Channels exposed by the BMP280 driver
//!
//! Every value the driver can produce is a channel: the twelve calibration
//! constants, the two raw ADC readings and the two compensated readings.
//! [`CHANNELS`] describes each of them, including where it lands in an
//! assembled sample and how it is encoded there.

use std::fmt;
use std::str::FromStr;

use crate::registers::{REG_PRESS_CALIB, REG_PRESS_MSB, REG_TEMP_CALIB, REG_TEMP_MSB};

/// Identity of a channel.
///
/// Calibration channels carry the zero-based position of the constant in
/// its group, so `TemperatureCalibration(0)` is `dig_T1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    TemperatureCalibration(u8),
    TemperatureRaw,
    TemperatureProcessed,
    PressureCalibration(u8),
    PressureRaw,
    PressureProcessed,
}

/// Signedness of a channel in the sample buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sign {
    Signed,
    Unsigned,
}

/// Width of a channel's cell in the sample buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Storage {
    Bits16,
    Bits32,
}

/// Byte order of a channel's cell in the sample buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endianness {
    /// Whatever the host CPU uses.
    Native,
    Little,
    Big,
}

/// How a channel value is laid out inside its cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScanType {
    pub sign: Sign,
    /// Number of meaningful bits.
    pub realbits: u8,
    pub storage: Storage,
    /// Position of the meaningful bits above the cell's LSB.
    pub shift: u8,
    pub endianness: Endianness,
}

impl Storage {
    pub fn bytes(self) -> usize {
        match self {
            Storage::Bits16 => 2,
            Storage::Bits32 => 4,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Storage::Bits16 => 16,
            Storage::Bits32 => 32,
        }
    }
}

/// Static description of one channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub channel: Channel,
    /// First register backing this channel, if it maps to one.
    pub address: Option<u8>,
    /// Position of this channel in an assembled sample.
    pub scan_index: u8,
    pub scan_type: ScanType,
}

const fn calibration(channel: Channel, address: u8, scan_index: u8, sign: Sign) -> ChannelSpec {
    ChannelSpec {
        channel,
        address: Some(address),
        scan_index,
        scan_type: ScanType {
            sign,
            realbits: 16,
            storage: Storage::Bits16,
            shift: 0,
            endianness: Endianness::Native,
        },
    }
}

const fn raw(channel: Channel, address: u8, scan_index: u8) -> ChannelSpec {
    ChannelSpec {
        channel,
        address: Some(address),
        scan_index,
        // 20 bits of two's complement data above 4 padding bits.
        scan_type: ScanType {
            sign: Sign::Signed,
            realbits: 20,
            storage: Storage::Bits32,
            shift: 4,
            endianness: Endianness::Native,
        },
    }
}

const fn processed(channel: Channel, scan_index: u8, sign: Sign) -> ChannelSpec {
    ChannelSpec {
        channel,
        address: None,
        scan_index,
        scan_type: ScanType {
            sign,
            realbits: 32,
            storage: Storage::Bits32,
            shift: 0,
            endianness: Endianness::Native,
        },
    }
}

pub const NUM_CHANNELS: usize = 16;

/// All channels, ordered by scan index.
pub static CHANNELS: [ChannelSpec; NUM_CHANNELS] = [
    calibration(Channel::TemperatureCalibration(0), REG_TEMP_CALIB, 0, Sign::Unsigned),
    calibration(Channel::TemperatureCalibration(1), REG_TEMP_CALIB + 2, 1, Sign::Signed),
    calibration(Channel::TemperatureCalibration(2), REG_TEMP_CALIB + 4, 2, Sign::Signed),
    raw(Channel::TemperatureRaw, REG_TEMP_MSB, 3),
    processed(Channel::TemperatureProcessed, 4, Sign::Signed),
    calibration(Channel::PressureCalibration(0), REG_PRESS_CALIB, 5, Sign::Unsigned),
    calibration(Channel::PressureCalibration(1), REG_PRESS_CALIB + 2, 6, Sign::Signed),
    calibration(Channel::PressureCalibration(2), REG_PRESS_CALIB + 4, 7, Sign::Signed),
    calibration(Channel::PressureCalibration(3), REG_PRESS_CALIB + 6, 8, Sign::Signed),
    calibration(Channel::PressureCalibration(4), REG_PRESS_CALIB + 8, 9, Sign::Signed),
    calibration(Channel::PressureCalibration(5), REG_PRESS_CALIB + 10, 10, Sign::Signed),
    calibration(Channel::PressureCalibration(6), REG_PRESS_CALIB + 12, 11, Sign::Signed),
    calibration(Channel::PressureCalibration(7), REG_PRESS_CALIB + 14, 12, Sign::Signed),
    calibration(Channel::PressureCalibration(8), REG_PRESS_CALIB + 16, 13, Sign::Signed),
    raw(Channel::PressureRaw, REG_PRESS_MSB, 14),
    processed(Channel::PressureProcessed, 15, Sign::Unsigned),
];

impl Channel {
    /// Look up this channel in [`CHANNELS`].
    ///
    /// Returns `None` for calibration indices that don't exist.
    pub fn spec(&self) -> Option<&'static ChannelSpec> {
        CHANNELS.iter().find(|spec| spec.channel == *self)
    }

    /// The sysfs-style attribute name, e.g. `in_temp3_raw`.
    pub fn name(&self) -> String {
        match *self {
            Channel::TemperatureCalibration(i) => format!("in_temp{}_raw", i),
            Channel::TemperatureRaw => "in_temp3_raw".to_string(),
            Channel::TemperatureProcessed => "in_temp_input".to_string(),
            Channel::PressureCalibration(i) => format!("in_pressure{}_raw", i),
            Channel::PressureRaw => "in_pressure9_raw".to_string(),
            Channel::PressureProcessed => "in_pressure_input".to_string(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returned when a channel name isn't one of ours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChannel(pub String);

impl fmt::Display for UnknownChannel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown channel {:?}", self.0)
    }
}

impl std::error::Error for UnknownChannel {}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Channel, UnknownChannel> {
        CHANNELS
            .iter()
            .map(|spec| spec.channel)
            .find(|channel| channel.name() == s)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

/// The value of a channel as returned by a direct read.
///
/// Compensated readings are fixed point; `Fractional` carries the divisor
/// needed to turn them into degrees Celsius or Pascal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelValue {
    Int(i64),
    Fractional { value: i64, divisor: i64 },
}

impl ChannelValue {
    /// The integer that goes into the sample buffer.
    pub fn value(&self) -> i64 {
        match *self {
            ChannelValue::Int(v) => v,
            ChannelValue::Fractional { value, .. } => value,
        }
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ChannelValue::Int(v) => write!(f, "{}", v),
            ChannelValue::Fractional { value, divisor } => {
                let nanos = value * 1_000_000_000 / divisor;
                let sign = if nanos < 0 { "-" } else { "" };
                let nanos = nanos.abs();
                write!(f, "{}{}.{:09}", sign, nanos / 1_000_000_000, nanos % 1_000_000_000)
            }
        }
    }
}

/// The set of channels enabled for triggered capture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ScanMask(u32);

impl ScanMask {
    pub fn empty() -> ScanMask {
        ScanMask(0)
    }

    pub fn all() -> ScanMask {
        ScanMask((1 << NUM_CHANNELS) - 1)
    }

    /// Enable the channel with the given scan index. Indices past the end of
    /// [`CHANNELS`] are ignored.
    pub fn with_index(self, scan_index: u8) -> ScanMask {
        if usize::from(scan_index) < NUM_CHANNELS {
            ScanMask(self.0 | (1 << scan_index))
        } else {
            self
        }
    }

    /// Enable a channel. Channels missing from [`CHANNELS`] are ignored.
    pub fn with(self, channel: Channel) -> ScanMask {
        match channel.spec() {
            Some(spec) => self.with_index(spec.scan_index),
            None => self,
        }
    }

    pub fn contains(&self, scan_index: u8) -> bool {
        usize::from(scan_index) < NUM_CHANNELS && self.0 & (1 << scan_index) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Enabled channels in ascending scan order.
    pub fn iter(&self) -> impl Iterator<Item = &'static ChannelSpec> {
        let mask = *self;
        CHANNELS
            .iter()
            .filter(move |spec| mask.contains(spec.scan_index))
    }

    /// Size in bytes of a sample holding the enabled channels.
    pub fn scan_bytes(&self) -> usize {
        self.iter().map(|spec| spec.scan_type.storage.bytes()).sum()
    }
}
