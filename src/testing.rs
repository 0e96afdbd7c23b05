//! Test doubles: an in-memory register file and a recording sample sink.

use std::collections::{HashMap, HashSet};
use std::io;
use std::time::SystemTime;

use crate::buffer::{AssembledBuffer, SampleSink};
use crate::bus::Bus;
use crate::channel::ScanMask;
use crate::registers::{
    BMP280_ID, REG_ID, REG_PRESS_CALIB, REG_PRESS_MSB, REG_TEMP_CALIB, REG_TEMP_MSB,
};

/// `dig_T1..dig_T3` from the datasheet's worked example.
pub const DATASHEET_TEMP_CALIB: [u8; 6] = [0x70, 0x6b, 0x43, 0x67, 0x18, 0xfc];

/// `dig_P1..dig_P9` from the datasheet's worked example.
pub const DATASHEET_PRESS_CALIB: [u8; 18] = [
    0x7d, 0x8e, 0x43, 0xd6, 0xd0, 0x0b, 0x27, 0x0b, 0x8c, 0x00, 0xf9, 0xff, 0x8c, 0x3c, 0xf8,
    0xc6, 0x70, 0x17,
];

/// adc_T = 519888, with non-zero padding bits.
pub const DATASHEET_TEMP_RAW: [u8; 3] = [0x7e, 0xed, 0x0a];

/// adc_P = 415148, with non-zero padding bits.
pub const DATASHEET_PRESS_RAW: [u8; 3] = [0x65, 0x5a, 0xc5];

pub struct FakeBus {
    regs: [u8; 256],
    short: HashMap<u8, usize>,
    failing: HashSet<u8>,
    pub byte_reads: usize,
    pub block_reads: usize,
    pub last_block: Option<(u8, usize)>,
    pub writes: Vec<(u8, u8)>,
}

impl FakeBus {
    pub fn new() -> FakeBus {
        FakeBus {
            regs: [0u8; 256],
            short: HashMap::new(),
            failing: HashSet::new(),
            byte_reads: 0,
            block_reads: 0,
            last_block: None,
            writes: Vec::new(),
        }
    }

    /// A chip holding the datasheet's example calibration and readings.
    pub fn datasheet() -> FakeBus {
        let mut bus = FakeBus::new();
        bus.set(REG_ID, &[BMP280_ID]);
        bus.set(REG_TEMP_CALIB, &DATASHEET_TEMP_CALIB);
        bus.set(REG_PRESS_CALIB, &DATASHEET_PRESS_CALIB);
        bus.set(REG_PRESS_MSB, &DATASHEET_PRESS_RAW);
        bus.set(REG_TEMP_MSB, &DATASHEET_TEMP_RAW);
        bus
    }

    pub fn set(&mut self, register: u8, data: &[u8]) {
        let start = usize::from(register);
        self.regs[start..start + data.len()].copy_from_slice(data);
    }

    /// Block reads starting at `register` transfer at most `len` bytes.
    pub fn truncate(&mut self, register: u8, len: usize) {
        self.short.insert(register, len);
    }

    /// Any access starting at `register` fails.
    pub fn fail(&mut self, register: u8) {
        self.failing.insert(register);
    }

    pub fn total_reads(&self) -> usize {
        self.byte_reads + self.block_reads
    }

    fn check(&self, register: u8) -> io::Result<()> {
        if self.failing.contains(&register) {
            Err(io::Error::new(io::ErrorKind::Other, "injected bus failure"))
        } else {
            Ok(())
        }
    }
}

impl Bus for FakeBus {
    type Error = io::Error;

    fn read_byte(&mut self, register: u8) -> io::Result<u8> {
        self.byte_reads += 1;
        self.check(register)?;
        Ok(self.regs[usize::from(register)])
    }

    fn write_byte(&mut self, register: u8, value: u8) -> io::Result<()> {
        self.check(register)?;
        self.writes.push((register, value));
        self.regs[usize::from(register)] = value;
        Ok(())
    }

    fn read_block(&mut self, register: u8, buf: &mut [u8]) -> io::Result<usize> {
        self.block_reads += 1;
        self.last_block = Some((register, buf.len()));
        self.check(register)?;
        let start = usize::from(register);
        let mut n = buf.len().min(self.regs.len() - start);
        if let Some(&limit) = self.short.get(&register) {
            n = n.min(limit);
        }
        buf[..n].copy_from_slice(&self.regs[start..start + n]);
        Ok(n)
    }
}

pub struct RecordingSink {
    mask: ScanMask,
    pub reject: bool,
    pub samples: Vec<Vec<u8>>,
    pub timestamps: Vec<SystemTime>,
    pub done: usize,
}

impl RecordingSink {
    pub fn new(mask: ScanMask) -> RecordingSink {
        RecordingSink {
            mask,
            reject: false,
            samples: Vec::new(),
            timestamps: Vec::new(),
            done: 0,
        }
    }
}

impl SampleSink for RecordingSink {
    type Error = String;

    fn active_scan_mask(&self) -> ScanMask {
        self.mask
    }

    fn push(&mut self, sample: &AssembledBuffer, timestamp: SystemTime) -> Result<(), String> {
        if self.reject {
            return Err("buffer full".to_string());
        }
        self.samples.push(sample.as_bytes().to_vec());
        self.timestamps.push(timestamp);
        Ok(())
    }

    fn notify_done(&mut self) {
        self.done += 1;
    }
}
