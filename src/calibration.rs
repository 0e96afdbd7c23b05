//! Factory calibration constants.
//!
//! The BMP280 stores twelve 16-bit trimming words, little endian, from 0x88
//! onwards: `dig_T1..dig_T3` followed by `dig_P1..dig_P9`. `dig_T1` and
//! `dig_P1` are unsigned, every other word is two's complement.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::bus::Bus;
use crate::registers::{PRESS_CALIB_LEN, REG_PRESS_CALIB, REG_TEMP_CALIB, TEMP_CALIB_LEN};
use crate::{read_exact, Bmp280Result};

/// Calibration constants of one sensor. Read once, never modified.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Calibration {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl Calibration {
    /// Read both calibration groups from the chip.
    ///
    /// Two block reads, one per group. A short read fails with
    /// [`Bmp280Error::ShortRead`](crate::Bmp280Error::ShortRead).
    pub fn load<B: Bus>(bus: &mut B) -> Bmp280Result<Calibration, B::Error> {
        let mut temp = [0u8; TEMP_CALIB_LEN];
        read_exact(bus, REG_TEMP_CALIB, &mut temp)?;
        let mut press = [0u8; PRESS_CALIB_LEN];
        read_exact(bus, REG_PRESS_CALIB, &mut press)?;

        let calibration = Calibration::from_bytes(&temp, &press);
        debug!("calibration: {:?}", calibration);
        Ok(calibration)
    }

    /// Parse the raw register contents of both groups.
    pub fn from_bytes(
        temp: &[u8; TEMP_CALIB_LEN],
        press: &[u8; PRESS_CALIB_LEN],
    ) -> Calibration {
        let t = |i: usize| LittleEndian::read_u16(&temp[i * 2..]);
        let p = |i: usize| LittleEndian::read_u16(&press[i * 2..]);
        Calibration {
            dig_t1: t(0),
            dig_t2: t(1) as i16,
            dig_t3: t(2) as i16,
            dig_p1: p(0),
            dig_p2: p(1) as i16,
            dig_p3: p(2) as i16,
            dig_p4: p(3) as i16,
            dig_p5: p(4) as i16,
            dig_p6: p(5) as i16,
            dig_p7: p(6) as i16,
            dig_p8: p(7) as i16,
            dig_p9: p(8) as i16,
        }
    }

    /// Temperature constant `dig_T<index>`, with `index` in `1..=3`.
    pub fn temperature(&self, index: usize) -> Option<i32> {
        match index {
            1 => Some(i32::from(self.dig_t1)),
            2 => Some(i32::from(self.dig_t2)),
            3 => Some(i32::from(self.dig_t3)),
            _ => None,
        }
    }

    /// Pressure constant `dig_P<index>`, with `index` in `1..=9`.
    pub fn pressure(&self, index: usize) -> Option<i32> {
        match index {
            1 => Some(i32::from(self.dig_p1)),
            2 => Some(i32::from(self.dig_p2)),
            3 => Some(i32::from(self.dig_p3)),
            4 => Some(i32::from(self.dig_p4)),
            5 => Some(i32::from(self.dig_p5)),
            6 => Some(i32::from(self.dig_p6)),
            7 => Some(i32::from(self.dig_p7)),
            8 => Some(i32::from(self.dig_p8)),
            9 => Some(i32::from(self.dig_p9)),
            _ => None,
        }
    }
}
